use vc_tree::EntryFailurePolicy;
use vc_tree::value::DEFAULT_SEPARATOR;

// -----------------------------------------------------------------------------
// ConfigOptions

/// Options of a [`ConfigDocument`](crate::ConfigDocument).
///
/// # Examples
///
/// ```
/// use vc_config::ConfigOptions;
///
/// let options = ConfigOptions::new()
///     .path_separator('/')
///     .indent(4)
///     .continue_on_serialization_error(true);
///
/// assert_eq!(options.get_path_separator(), '/');
/// assert_eq!(options.get_indent(), 4);
/// assert!(options.get_continue_on_serialization_error());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigOptions {
    path_separator: char,
    indent: usize,
    continue_on_serialization_error: bool,
    entry_failure_policy: EntryFailurePolicy,
}

impl Default for ConfigOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigOptions {
    /// `'.'` separator, two spaces of indent, fail-fast loading, and
    /// skipping of entries that cannot be saved.
    #[inline]
    pub const fn new() -> Self {
        Self {
            path_separator: DEFAULT_SEPARATOR,
            indent: 2,
            continue_on_serialization_error: false,
            entry_failure_policy: EntryFailurePolicy::SkipEntry,
        }
    }

    /// Separator between the segments of a path.
    ///
    /// Only affects sections created after the change.
    #[inline]
    pub const fn path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }

    /// Spaces per level when saving; `0` saves on a single line.
    #[inline]
    pub const fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Whether loading replaces objects that cannot be rebuilt by null
    /// instead of failing.
    #[inline]
    pub const fn continue_on_serialization_error(mut self, enabled: bool) -> Self {
        self.continue_on_serialization_error = enabled;
        self
    }

    /// What saving does with an entry that cannot be serialized.
    #[inline]
    pub const fn entry_failure_policy(mut self, policy: EntryFailurePolicy) -> Self {
        self.entry_failure_policy = policy;
        self
    }

    #[inline]
    pub const fn get_path_separator(&self) -> char {
        self.path_separator
    }

    #[inline]
    pub const fn get_indent(&self) -> usize {
        self.indent
    }

    #[inline]
    pub const fn get_continue_on_serialization_error(&self) -> bool {
        self.continue_on_serialization_error
    }

    #[inline]
    pub const fn get_entry_failure_policy(&self) -> EntryFailurePolicy {
        self.entry_failure_policy
    }
}
