use super::Parser;

#[derive(Parser, Debug)]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,
    /// Override the store file path from the settings file.
    #[arg(long)]
    pub store: Option<String>,
}
