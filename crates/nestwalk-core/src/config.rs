//! Walk configuration and optional format capabilities.

/// Configuration for a walk.
///
/// # Examples
///
/// ```
/// use nestwalk_core::WalkConfig;
///
/// // Defaults: sniff extensionless files, descend into 7z when available
/// let config = WalkConfig::default();
///
/// // Deterministic order, stop at the first error
/// let strict = WalkConfig {
///     sort_dirs: true,
///     fail_fast: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct WalkConfig {
    /// Examine the leading bytes of regular files whose name has no
    /// extension to detect containers by magic number.
    pub sniff_content: bool,

    /// Descend into 7z archives. Has no effect unless the crate is built
    /// with the `sevenz` feature.
    pub sevenz: bool,

    /// End the walk after the first node-scoped error has been reported.
    pub fail_fast: bool,

    /// Visit real directory children in file-name order instead of the
    /// order the operating system returns them in.
    pub sort_dirs: bool,

    /// Resolve a root that is itself a symbolic link instead of reporting
    /// it as a link. Links below the root are never followed.
    pub follow_root_links: bool,
}

impl Default for WalkConfig {
    /// Default values:
    /// - `sniff_content`: true
    /// - `sevenz`: true
    /// - `fail_fast`: false
    /// - `sort_dirs`: false
    /// - `follow_root_links`: false
    fn default() -> Self {
        Self {
            sniff_content: true,
            sevenz: true,
            fail_fast: false,
            sort_dirs: false,
            follow_root_links: false,
        }
    }
}

impl WalkConfig {
    /// Returns the formats this configuration can actually descend into.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        let detected = Capabilities::detect();
        Capabilities {
            sevenz: detected.sevenz && self.sevenz,
        }
    }
}

/// Optional container formats available to the walker.
///
/// Formats that are not available are still classified as archives and
/// reported, but the walker does not descend into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// 7z support is compiled in and enabled.
    pub sevenz: bool,
}

impl Capabilities {
    /// Returns the capabilities compiled into this build.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            sevenz: cfg!(feature = "sevenz"),
        }
    }

    /// Returns a set with every optional format disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self { sevenz: false }
    }
}
