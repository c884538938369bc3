use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use geo::Point;

use crate::cli::{Cli, ExportArgs, InspectArgs};
use crate::config::LayerKey;
use crate::io::geojson::{load_layer, write_feature_collection};
use crate::store::ZoneStore;
use crate::zone::ZoneFeature;

/// Load every configured layer from `data` into a fresh store and rebuild
/// the derived layers. Individual layer failures degrade to empty
/// collections inside `load_layer`; only a fully empty store is fatal,
/// since the dashboard would have nothing to show.
fn load_store(data: &Path, verbose: u8) -> Result<ZoneStore> {
    let mut store = ZoneStore::with_defaults();
    for config in store.configs().to_vec() {
        let collection = load_layer(&data.join(config.source), &config, verbose);
        store.insert(config.key, collection);
    }

    if LayerKey::ALL.iter().all(|key| store.collection(*key).is_none_or(|c| c.is_empty())) {
        bail!("no usable zone data in {}", data.display());
    }

    store.rebuild_derived();
    Ok(store)
}

pub fn inspect(cli: &Cli, args: &InspectArgs) -> Result<()> {
    let store = load_store(&args.data, cli.verbose)?;

    if cli.verbose > 0 {
        eprintln!("[inspect] point=({}, {})", args.lng, args.lat);
    }

    let report = store.inspect(Point::new(args.lng, args.lat));
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn score(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let store = load_store(&args.data, cli.verbose)?;

    let cells: Vec<ZoneFeature> = store.opportunity().iter()
        .cloned()
        .map(|cell| cell.into_feature())
        .collect();
    if cli.verbose > 0 {
        eprintln!("[score] {} cell(s) -> {}", cells.len(), args.output.display());
    }

    write_export(&args.output, &cells)
}

pub fn rings(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let store = load_store(&args.data, cli.verbose)?;

    let flood = store.collection(LayerKey::Flood)
        .map(|collection| collection.features().to_vec())
        .unwrap_or_default();
    if cli.verbose > 0 {
        eprintln!("[rings] {} ring(s) -> {}", flood.len(), args.output.display());
    }

    write_export(&args.output, &flood)
}

fn write_export(output: &Path, features: &[ZoneFeature]) -> Result<()> {
    let bytes = write_feature_collection(features)?;
    fs::write(output, bytes).with_context(|| format!("Failed to write {}", output.display()))
}
