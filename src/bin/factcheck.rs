//! factcheck: compare a reference article with a candidate text
//!
//! Builds a knowledge graph and sentence list for each text, scores the raw
//! pair with the NLI model, and prints the report to stdout. Logs go to
//! stderr; set `FACTCHECK_LOG` (e.g. `debug`) to change the level.
//!
//! Reads `factcheck.json` from the working directory when present.

use factcore::{
    ContradictionScorer, OnnxNliClassifier, Orchestrator, PipelineConfig, PrecomputedAnnotator, CONFIG_FILE,
};
use std::error::Error;
use std::io;
use tracing_subscriber::EnvFilter;

/// Must match the annotated text in the corpus byte for byte
const ARTICLE: &str = concat!(
    "Norway (Norwegian Norge (Bokmål) or Noreg (Nynorsk); North Sami Norga, South Sami Nöörje, ",
    "Lulesam Vuodna, Kven Norja), officially the Kingdom of Norway or Kongeriket Norge/Noreg, ",
    "is a country in Northern Europe on the Scandinavian peninsula. ",
    "In addition to the mainland, the Kingdom of Norway includes the archipelago of Svalbard ",
    "and the island of Jan Mayen. ",
    "The capital and most populous city is Oslo. ",
    "The country is located in the west of the Scandinavian Peninsula and borders Sweden ",
    "to the east and Finland and Russia to the northeast. ",
    "Norway is one of the largest countries in Europe in terms of area (8th), ",
    "but is sparsely populated with only 5,550,203 inhabitants (as of January 1, 2024). ",
    "The majority of the population lives in the south of the country. ",
    "As a result of the agreement concluded between Sweden and Denmark as part of the Peace of Kiel, ",
    "Norway transitioned from the Union of Denmark-Norway to a union with Sweden in 1814. ",
    "On May 17, 1814, Norway received its own constitution. ",
    "Norway finally gained its current independence when the union with Sweden was dissolved in 1905.[6] ",
    "Norway's form of government is a parliamentary monarchy."
);
const CANDIDATE: &str = "BikeBox is a secure bicycle storage.";

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FACTCHECK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = PipelineConfig::load_or_default(CONFIG_FILE)?;

    let annotator = PrecomputedAnnotator::from_path(&config.annotations)?;
    let classifier = OnnxNliClassifier::from_files(&config.model_path, &config.tokenizer_path, config.nli.clone())?;
    let scorer = ContradictionScorer::new(Box::new(classifier)).with_separator(config.nli.separator.as_str());

    let orchestrator = Orchestrator::new(&annotator, &scorer).with_policy(config.candidate_policy);
    let report = orchestrator.compare(ARTICLE, CANDIDATE)?;

    println!("{}", report);
    println!("\nArticle KG (DOT):\n{}", report.article.graph.to_dot());

    Ok(())
}
