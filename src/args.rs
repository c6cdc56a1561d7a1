//! CLI args

use std::path::PathBuf;

#[derive(Clone, Debug, clap::Parser)]
#[command(version, about)]
pub struct Args {
    /// The URL of a Google Web Fonts stylesheet
    /// (e.g. https://fonts.googleapis.com/css2?family=Lato:ital,wght@0,400&display=swap)
    #[arg(short, long)]
    pub url: String,
    /// A relative or absolute path to the output directory
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,
    /// The location of the CDN or server where the fonts will be self hosted
    /// (e.g. https://cdn.my-server.com/fonts/)
    #[arg(short, long, default_value = "")]
    pub destination: String,
}
