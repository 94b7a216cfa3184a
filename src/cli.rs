use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "notepluck")]
#[command(version)]
#[command(about = "Extract audio, image, and PDF attachments from note containers", long_about = None)]
#[command(after_help = "Examples:\n  \
  notepluck lecture.goodnotes            extract attachments to the current directory\n  \
  notepluck -l notes.goodnotes           list attachments without saving\n  \
  notepluck -d out a.goodnotes b.goodnotes   pull from several containers at once\n  \
  notepluck https://example.com/x.goodnotes  extract from a remote container")]
pub struct Cli {
    /// Note container files or HTTP URLs
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<String>,

    /// List attachments (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Save attachments into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Drop attachments whose content cannot be identified
    /// (by default they are kept and treated as audio)
    #[arg(long)]
    pub strict: bool,

    /// Milliseconds between successive saves in a batch
    #[arg(long, value_name = "MS", default_value_t = 300)]
    pub delay_ms: u64,

    /// Quiet mode
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }
}
