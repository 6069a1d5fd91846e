//! Render a request document from CLI flags or a JSON input file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use meldgate_core::query::QueryInput;

#[derive(Args)]
pub struct ComposeArgs {
    /// Read the query from a JSON file instead of flags
    #[arg(long, value_name = "FILE", conflicts_with_all = ["vorname", "nachname"])]
    pub input: Option<PathBuf>,

    /// Message type code ("1332" free search, "1330" person search)
    #[arg(long)]
    pub message_type: Option<String>,

    /// Given name
    #[arg(long)]
    pub vorname: Option<String>,

    /// Family name
    #[arg(long)]
    pub nachname: Option<String>,

    /// Birth date; partial dates allowed (e.g. "1990" or "1990-05")
    #[arg(long)]
    pub geburtsdatum: Option<String>,

    /// Gender code
    #[arg(long)]
    pub geschlecht: Option<String>,

    #[arg(long)]
    pub strasse: Option<String>,

    #[arg(long)]
    pub hausnummer: Option<String>,

    #[arg(long)]
    pub hausnummer_buchstabe: Option<String>,

    #[arg(long)]
    pub hausnummer_zusatz: Option<String>,

    #[arg(long)]
    pub plz: Option<String>,

    #[arg(long)]
    pub ort: Option<String>,

    /// Municipality key (person search only)
    #[arg(long)]
    pub gemeindeschluessel: Option<String>,

    /// Raw XML fragment to splice into the search profile
    #[arg(long)]
    pub custom_xml: Option<String>,

    /// Write the document to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ComposeArgs {
    fn into_input(self) -> Result<QueryInput> {
        if let Some(path) = &self.input {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()));
        }
        Ok(QueryInput {
            message_type: self.message_type,
            vorname: self.vorname,
            nachname: self.nachname,
            geburtsdatum: self.geburtsdatum,
            geschlecht: self.geschlecht,
            strasse: self.strasse,
            hausnummer: self.hausnummer,
            hausnummer_buchstabe: self.hausnummer_buchstabe,
            hausnummer_zusatz: self.hausnummer_zusatz,
            plz: self.plz,
            ort: self.ort,
            gemeindeschluessel: self.gemeindeschluessel,
            custom_xml: self.custom_xml,
        })
    }
}

pub fn run(args: ComposeArgs) -> Result<()> {
    let output = args.output.clone();
    let document = meldgate_compose::compose_input(args.into_input()?)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &document)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Document written to {}", path.display());
        }
        None => println!("{document}"),
    }
    Ok(())
}
