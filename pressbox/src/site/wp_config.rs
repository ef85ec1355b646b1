//! Seeding and editing wp-config.php inside the execution environment.

use std::fmt;
use std::path::Path;

use crate::errors::PressboxResult;
use crate::php::FileStore;

/// A PHP literal for a configuration constant.
#[derive(Clone, Debug)]
pub enum PhpLiteral {
    Str(String),
    Bool(bool),
}

impl PhpLiteral {
    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }
}

impl fmt::Display for PhpLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpLiteral::Str(value) => {
                write!(f, "'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
            }
            PhpLiteral::Bool(true) => f.write_str("true"),
            PhpLiteral::Bool(false) => f.write_str("false"),
        }
    }
}

/// Seed wp-config.php from the sample template shipped with WordPress.
pub async fn seed_from_sample<S: FileStore + ?Sized>(
    store: &S,
    document_root: &Path,
) -> PressboxResult<()> {
    let sample = store
        .read_file_to_string(&document_root.join("wp-config-sample.php"))
        .await?;
    store
        .write_file(&document_root.join("wp-config.php"), &sample)
        .await
}

/// Inject `define(...)` constants right after the opening tag of
/// wp-config.php so they take precedence over anything defined later in
/// the file.
pub async fn define_constants<S: FileStore + ?Sized>(
    store: &S,
    document_root: &Path,
    constants: &[(&str, PhpLiteral)],
) -> PressboxResult<()> {
    let path = document_root.join("wp-config.php");
    let contents = store.read_file_to_string(&path).await?;

    let mut block = String::new();
    for (name, value) in constants {
        block.push_str(&format!("define( '{name}', {value} );\n"));
    }

    let updated = contents.replacen("<?php", &format!("<?php\n{block}"), 1);
    store.write_file(&path, &updated).await
}
