use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crs_domain::CatalogItem;

use crate::{Error, Result};

pub const SCHEMA_VERSION: u32 = 1;
pub const MANIFEST_FILE: &str = "manifest.json";
pub const CATALOG_FILE: &str = "catalog.json";
pub const VECTORS_FILE: &str = "vectors.f32";
pub const ABBREVIATIONS_FILE: &str = "abbreviations.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
	pub schema_version: u32,
	pub catalog_hash: String,
	pub embedding_model: String,
	pub dimensions: usize,
	pub rows: usize,
}

/// One catalog table row. Its position matches the vector row of the same item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
	pub item: CatalogItem,
	pub combined_text: String,
}
impl CatalogRow {
	pub fn new(item: CatalogItem) -> Self {
		let combined_text = item.combined_text();

		Self { item, combined_text }
	}
}

/// Everything an index directory holds, decoded but not yet cross-checked.
#[derive(Debug)]
pub struct RawArtifacts {
	pub manifest: Manifest,
	pub rows: Vec<CatalogRow>,
	pub vectors: Vec<f32>,
	pub abbreviations: BTreeMap<String, String>,
}

/// Hex blake3 digest of the JSON encoding of the item list.
pub fn catalog_hash(items: &[CatalogItem]) -> Result<String> {
	let encoded = serde_json::to_vec(items).map_err(|err| Error::json("catalog items", err))?;

	Ok(blake3::hash(&encoded).to_hex().to_string())
}

/// Reads just the manifest, for staleness checks.
pub fn read_manifest(dir: &Path) -> Result<Manifest> {
	read_json(&dir.join(MANIFEST_FILE))
}

pub fn read(dir: &Path) -> Result<RawArtifacts> {
	let manifest: Manifest = read_json(&dir.join(MANIFEST_FILE))?;

	if manifest.schema_version != SCHEMA_VERSION {
		return Err(Error::Validation(format!(
			"Unsupported schema version {}, expected {SCHEMA_VERSION}.",
			manifest.schema_version
		)));
	}

	let rows: Vec<CatalogRow> = read_json(&dir.join(CATALOG_FILE))?;
	let vectors = read_vectors(&dir.join(VECTORS_FILE))?;
	let abbreviations_path = dir.join(ABBREVIATIONS_FILE);
	let abbreviations = if abbreviations_path.exists() {
		read_json(&abbreviations_path)?
	} else {
		tracing::warn!(path = %abbreviations_path.display(), "Abbreviation map missing. Using static abbreviations only.");

		BTreeMap::new()
	};

	Ok(RawArtifacts { manifest, rows, vectors, abbreviations })
}

/// Writes all files, manifest last, so a directory with a manifest is complete.
pub fn write(
	dir: &Path,
	manifest: &Manifest,
	rows: &[CatalogRow],
	vectors: &[f32],
	abbreviations: &BTreeMap<String, String>,
) -> Result<()> {
	fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))?;

	write_json(&dir.join(CATALOG_FILE), rows, "catalog table")?;
	write_vectors(&dir.join(VECTORS_FILE), vectors)?;
	write_json(&dir.join(ABBREVIATIONS_FILE), abbreviations, "abbreviation map")?;
	write_json(&dir.join(MANIFEST_FILE), manifest, "manifest")?;

	Ok(())
}

fn read_json<T>(path: &Path) -> Result<T>
where
	T: DeserializeOwned,
{
	let raw = fs::read(path).map_err(|err| Error::io(path, err))?;

	serde_json::from_slice(&raw).map_err(|err| Error::json(path.display().to_string(), err))
}

fn write_json<T>(path: &Path, value: &T, what: &str) -> Result<()>
where
	T: Serialize + ?Sized,
{
	let encoded = serde_json::to_vec_pretty(value).map_err(|err| Error::json(what, err))?;

	write_atomically(path, &encoded)
}

fn read_vectors(path: &Path) -> Result<Vec<f32>> {
	let raw = fs::read(path).map_err(|err| Error::io(path, err))?;

	if raw.len() % 4 != 0 {
		return Err(Error::Misaligned(format!(
			"{} is {} bytes, not a whole number of f32 values.",
			path.display(),
			raw.len()
		)));
	}

	Ok(raw
		.chunks_exact(4)
		.map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
		.collect())
}

fn write_vectors(path: &Path, vectors: &[f32]) -> Result<()> {
	let encoded = vectors.iter().flat_map(|value| value.to_le_bytes()).collect::<Vec<_>>();

	write_atomically(path, &encoded)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
	let mut staging = PathBuf::from(path);

	staging.set_extension("tmp");

	fs::write(&staging, bytes).map_err(|err| Error::io(&staging, err))?;
	fs::rename(&staging, path).map_err(|err| Error::io(path, err))?;

	Ok(())
}
