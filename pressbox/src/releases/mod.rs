//! Static registry of downloadable WordPress releases.
//!
//! A fixed set of release identifiers (named stable versions plus the
//! "beta" and "nightly" channels), each statically bound to one archive
//! descriptor. The set is closed so an unknown identifier fails fast,
//! before any download is attempted.

use crate::errors::{PressboxError, PressboxResult};

/// A downloadable WordPress distribution archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    /// Release identifier as accepted in options.
    pub version: &'static str,
    /// Archive size in bytes, used for download progress reporting.
    pub size: u64,
    /// Where the gzip-compressed tar archive is fetched from.
    pub url: &'static str,
}

/// Every release pressbox knows how to provision, newest first.
pub const KNOWN_RELEASES: &[ReleaseDescriptor] = &[
    ReleaseDescriptor {
        version: "nightly",
        size: 18_651_516,
        url: "https://wordpress.org/nightly-builds/wordpress-latest.tar.gz",
    },
    ReleaseDescriptor {
        version: "beta",
        size: 18_381_300,
        url: "https://wordpress.org/wordpress-beta.tar.gz",
    },
    ReleaseDescriptor {
        version: "6.6",
        size: 18_382_440,
        url: "https://wordpress.org/wordpress-6.6.tar.gz",
    },
    ReleaseDescriptor {
        version: "6.5",
        size: 4_887_384,
        url: "https://wordpress.org/wordpress-6.5.tar.gz",
    },
    ReleaseDescriptor {
        version: "6.4",
        size: 4_774_235,
        url: "https://wordpress.org/wordpress-6.4.tar.gz",
    },
    ReleaseDescriptor {
        version: "6.3",
        size: 3_595_053,
        url: "https://wordpress.org/wordpress-6.3.tar.gz",
    },
];

/// Look up the descriptor for a release identifier.
///
/// Unknown identifiers are a configuration error; the message lists every
/// identifier the registry knows.
pub fn details(version: &str) -> PressboxResult<&'static ReleaseDescriptor> {
    KNOWN_RELEASES
        .iter()
        .find(|release| release.version == version)
        .ok_or_else(|| {
            let known = KNOWN_RELEASES
                .iter()
                .map(|release| release.version)
                .collect::<Vec<_>>()
                .join(", ");
            PressboxError::Config(format!(
                "Unknown WordPress release: {version}. Known releases: {known}"
            ))
        })
}
