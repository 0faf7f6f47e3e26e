use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

mod process_snapshot;

pub use process_snapshot::*;

pub trait ArtifactExt
where
    Self: Sized + Serialize + DeserializeOwned,
{
    /// WARNING: This doesn't support generic types
    fn name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    fn file_name() -> String {
        format!("{}.msgpack", Self::name())
    }

    fn encode_to_writer<W: std::io::Write>(&self, mut writer: W) -> anyhow::Result<()> {
        let encoded = rmp_serde::to_vec_named(self)?;
        writer.write_all(&encoded)?;
        Ok(())
    }

    fn decode_from_reader<R: std::io::Read>(reader: R) -> anyhow::Result<Self> {
        Ok(rmp_serde::from_read(reader)?)
    }

    /// Save the artifact under `folder` and return the path of the written file
    fn save_to<P: AsRef<Path>>(&self, folder: P) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(folder.as_ref())?;
        let path = folder.as_ref().join(Self::file_name());
        let file = std::fs::File::create(&path)?;
        self.encode_to_writer(std::io::BufWriter::new(file))?;

        debug!("Saved {} to {}", Self::name(), path.display());
        Ok(path)
    }

    fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let artifact = Self::decode_from_reader(std::io::BufReader::new(file))?;

        debug!("Loaded {} from {}", Self::name(), path.as_ref().display());
        Ok(artifact)
    }
}
