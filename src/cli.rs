//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;
use url::Url;

#[derive(Debug, StructOpt)]
#[structopt(name = "udtrain", about = "UD treebank training pipeline.")]
/// Holds every command that is callable by the `udtrain` command.
pub enum UdTrain {
    #[structopt(about = "Download a UD release and build the treebank catalog")]
    Fetch(Fetch),
    #[structopt(about = "Train one model per catalogued treebank")]
    Train(Train),
    #[structopt(about = "Aggregate best scores of trained models")]
    Stats(Stats),
}

#[derive(Debug, StructOpt)]
/// Fetch command and parameters.
pub struct Fetch {
    #[structopt(help = "UD release version (e.g. 2.15)")]
    pub version: String,
    #[structopt(help = "release archive URL")]
    pub url: Url,
    #[structopt(
        parse(from_os_str),
        long = "config",
        help = "pipeline configuration file",
        default_value = "udtrain.json"
    )]
    pub config: PathBuf,
}

#[derive(Debug, StructOpt)]
/// Train command and parameters.
pub struct Train {
    #[structopt(help = "UD release version the catalog was built from")]
    pub version: String,
    #[structopt(
        parse(from_os_str),
        long = "config",
        help = "pipeline configuration file",
        default_value = "udtrain.json"
    )]
    pub config: PathBuf,
}

#[derive(Debug, StructOpt)]
/// Stats command and parameters.
pub struct Stats {
    #[structopt(
        parse(from_os_str),
        long = "config",
        help = "pipeline configuration file",
        default_value = "udtrain.json"
    )]
    pub config: PathBuf,
}
