use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tsr binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsr",
    version,
    about = "Rewrites TypeScript so that its static types are checked at runtime"
)]
pub struct CliArgs {
    /// Entry file of the program to transform.
    pub entry: PathBuf,

    /// JSON file with transform options (camelCase keys).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // ==================== Run control ====================
    /// Continue past diagnostics of the input or the rewritten program.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Emit even when the rewritten program has diagnostics.
    #[arg(long = "finishOnError", alias = "finish-on-error")]
    pub finish_on_error: bool,

    /// Keep the temporary workspace after the run.
    #[arg(long = "keepTemp", alias = "keep-temp")]
    pub keep_temp: bool,

    /// Name of the temporary workspace folder.
    #[arg(long = "tempFolder", alias = "temp-folder")]
    pub temp_folder: Option<String>,

    /// Do not print events and diagnostics.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Colored output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    // ==================== Generated code ====================
    /// Do not attach descriptors to functions and classes.
    #[arg(long = "noAnnotate", alias = "no-annotate")]
    pub no_annotate: bool,

    /// Prefix of synthesized descriptor bindings.
    #[arg(long = "declarationPrefix", alias = "declaration-prefix")]
    pub declaration_prefix: Option<String>,

    /// Base name of the declarations file, without extension.
    #[arg(long = "declarationFileName", alias = "declaration-file-name")]
    pub declaration_file_name: Option<String>,

    /// Identifier the runtime library is bound to.
    #[arg(long = "libIdentifier", alias = "lib-identifier")]
    pub lib_identifier: Option<String>,

    /// Prefix used when the library identifier is already taken.
    #[arg(long = "libNamespace", alias = "lib-namespace")]
    pub lib_namespace: Option<String>,

    /// Module the runtime library is imported from.
    #[arg(long = "libModule", alias = "lib-module")]
    pub lib_module: Option<String>,

    // ==================== Compiler options ====================
    /// Directory for emitted JavaScript, relative to the entry's directory.
    #[arg(long = "outDir", alias = "out-dir")]
    pub out_dir: Option<String>,

    #[arg(short = 't', long, value_enum, ignore_case = true)]
    pub target: Option<Target>,

    #[arg(short = 'm', long, value_enum, ignore_case = true)]
    pub module: Option<Module>,

    /// Enable or disable strict null checks.
    #[arg(long = "strictNullChecks", alias = "strict-null-checks")]
    pub strict_null_checks: Option<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Es3,
    Es5,
    #[value(alias = "es6")]
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    #[value(name = "esnext")]
    EsNext,
}

impl Target {
    /// The compiler option spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Es3 => "es3",
            Target::Es5 => "es5",
            Target::Es2015 => "es2015",
            Target::Es2016 => "es2016",
            Target::Es2017 => "es2017",
            Target::Es2018 => "es2018",
            Target::Es2019 => "es2019",
            Target::Es2020 => "es2020",
            Target::EsNext => "esnext",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Module {
    None,
    #[value(name = "commonjs")]
    CommonJs,
    Amd,
    Umd,
    System,
    #[value(alias = "es6")]
    Es2015,
    Es2020,
    #[value(name = "esnext")]
    EsNext,
}

impl Module {
    pub fn as_str(self) -> &'static str {
        match self {
            Module::None => "none",
            Module::CommonJs => "commonjs",
            Module::Amd => "amd",
            Module::Umd => "umd",
            Module::System => "system",
            Module::Es2015 => "es2015",
            Module::Es2020 => "es2020",
            Module::EsNext => "esnext",
        }
    }
}
