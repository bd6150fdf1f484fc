use plover_binder::BinderOptions;

/// Settings for a compilation and every submission continued from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Bind global statements as a script whose value is its last expression
    pub script_mode: bool,
    /// Report every warning as an error
    pub warnings_as_errors: bool,
}

impl CompilationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_mode(mut self, script_mode: bool) -> Self {
        self.script_mode = script_mode;
        self
    }

    pub fn warnings_as_errors(mut self, warnings_as_errors: bool) -> Self {
        self.warnings_as_errors = warnings_as_errors;
        self
    }

    pub(crate) fn binder_options(&self) -> BinderOptions {
        BinderOptions::new().script_mode(self.script_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_setters() {
        let options = CompilationOptions::new();
        assert!(!options.script_mode);
        assert!(!options.warnings_as_errors);

        let options = options.script_mode(true).warnings_as_errors(true);
        assert!(options.binder_options().script_mode);
        assert!(options.warnings_as_errors);
    }
}
