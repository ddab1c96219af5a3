use crate::config::MetadataOverrides;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Maven plugin descriptor generator
#[derive(Parser, Debug)]
#[command(
    name = "mojodesc",
    about = "Generate Maven plugin descriptors from annotated class files",
    version,
    author,
    long_about = "mojodesc reads the @Mojo, @Parameter, @Component and @Execute annotations \
                  recorded in compiled plugin classes and writes the META-INF/maven/plugin.xml \
                  descriptor Maven uses to load the plugin."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Write plugin.xml for a set of class directories",
        long_about = "Scans the class directories, resolves inherited parameters and @Execute \
                      declarations and writes the plugin descriptor. The file is only replaced \
                      when its content changes.\n\n\
                      Examples:\n  \
                      mojodesc generate --classes target/classes --output target/classes/META-INF/maven/plugin.xml --config mojodesc.toml\n  \
                      mojodesc generate --classes target/classes --output plugin.xml \\\n    \
                      --group-id com.acme --artifact-id acme-maven-plugin --plugin-version 1.0.0"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Print the goals found in a set of class directories",
        long_about = "Runs the same extraction as generate without writing a descriptor.\n\n\
                      Examples:\n  \
                      mojodesc inspect --classes target/classes\n  \
                      mojodesc inspect --classes target/classes --format json"
    )]
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ClassesArgs {
    #[arg(
        short = 'c',
        long = "classes",
        value_name = "DIR",
        required = true,
        num_args = 1..,
        help = "Directory of compiled classes (repeatable)"
    )]
    pub class_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub classes: ClassesArgs,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Destination of the plugin descriptor"
    )]
    pub output: PathBuf,

    #[arg(long, value_name = "FILE", help = "Plugin metadata file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "GROUP_ID", help = "Override the plugin groupId")]
    pub group_id: Option<String>,

    #[arg(long, value_name = "ARTIFACT_ID", help = "Override the plugin artifactId")]
    pub artifact_id: Option<String>,

    #[arg(long, value_name = "VERSION", help = "Override the plugin version")]
    pub plugin_version: Option<String>,

    #[arg(long, value_name = "NAME", help = "Override the plugin display name")]
    pub name: Option<String>,

    #[arg(long, value_name = "PREFIX", help = "Override the goal prefix")]
    pub goal_prefix: Option<String>,

    #[arg(long, help = "Omit the generator comment from the descriptor")]
    pub no_comment: bool,
}

impl GenerateArgs {
    pub fn overrides(&self) -> MetadataOverrides {
        MetadataOverrides {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.plugin_version.clone(),
            name: self.name.clone(),
            goal_prefix: self.goal_prefix.clone(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub classes: ClassesArgs,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
