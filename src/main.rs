use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;

use mfdnres::results::loader;
use mfdnres::{FormatRegistry, ResultsDataset};

const USAGE: &str = "usage: mfdnres <format> <filename>... [--dataset <file.json|file.csv>]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(format) = args.next() else {
        bail!("{USAGE}");
    };

    let mut filenames = Vec::new();
    let mut dataset_path = None;
    while let Some(arg) = args.next() {
        if arg == "--dataset" {
            dataset_path = Some(args.next().context("--dataset needs a file")?);
        } else {
            filenames.push(arg);
        }
    }
    if filenames.is_empty() {
        bail!("{USAGE}");
    }

    let registry = FormatRegistry::with_builtin_formats()?;
    let mut descriptors = Vec::with_capacity(filenames.len());
    for filename in &filenames {
        // descriptors are parsed from the basename only
        let basename = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("no basename in {filename:?}"))?;
        let descriptor = registry.parse(basename, &format)?;
        println!("{}", serde_json::to_string(&descriptor)?);
        descriptors.push(descriptor);
    }

    if let Some(path) = dataset_path {
        let mut dataset: ResultsDataset = loader::load_file(Path::new(&path))?;
        if let Some(descriptor) = descriptors.first() {
            dataset.extend_params(descriptor);
        }
        info!("{} parameters after merging descriptor", dataset.params.len());
        for qn in dataset.get_levels() {
            if let Some(energy) = dataset.get_energy(&qn) {
                println!("{qn}\t{energy:.3}");
            }
        }
    }

    Ok(())
}
