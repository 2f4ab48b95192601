//! Compiler option validation.

use tsr_common::diagnostics::diagnostic_messages;
use tsr_common::{CompilerOptions, Diagnostic};

const TARGETS: &[&str] = &[
    "es3", "es5", "es6", "es2015", "es2016", "es2017", "es2018", "es2019", "es2020", "es2021",
    "es2022", "esnext",
];

const MODULES: &[&str] = &[
    "none", "commonjs", "amd", "umd", "system", "es6", "es2015", "es2020", "es2022", "esnext",
    "node16", "nodenext",
];

const MODULE_RESOLUTIONS: &[&str] = &["classic", "node", "node10", "node16", "nodenext", "bundler"];

/// One diagnostic per option whose value is not a known choice.
pub fn check_options(options: &CompilerOptions) -> Vec<Diagnostic> {
    let checks: [(&str, Option<&str>, &[&str]); 3] = [
        ("target", options.target.as_deref(), TARGETS),
        ("module", options.module.as_deref(), MODULES),
        (
            "moduleResolution",
            options.module_resolution.as_deref(),
            MODULE_RESOLUTIONS,
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(option, value, allowed)| {
            let value = value?.to_ascii_lowercase();
            if allowed.contains(&value.as_str()) {
                return None;
            }
            let choices = allowed
                .iter()
                .map(|choice| format!("'{choice}'"))
                .collect::<Vec<_>>()
                .join(", ");
            Some(Diagnostic::global(
                &diagnostic_messages::ARGUMENT_FOR_OPTION_MUST_BE,
                &[option, &choices],
            ))
        })
        .collect()
}
