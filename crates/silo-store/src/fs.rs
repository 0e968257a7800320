use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use silo_types::{Address, ContainerId, ObjectId};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::filter::{matches_all, SearchFilter};
use crate::object::{HeaderView, Object};
use crate::traits::StorageEngine;

/// Length + CRC32 prefix in front of every object file.
const FRAME_HEADER: usize = 8;
const GRAVEYARD_DIR: &str = ".graveyard";

/// Filesystem storage engine.
///
/// Layout under the root directory:
///
/// ```text
/// <root>/<cid-hex>/<oid-hex>             framed object
/// <root>/.graveyard/<cid-hex>/<oid-hex>  tombstone address of a removed object
/// ```
///
/// Object files are framed as:
///
/// ```text
/// [4 bytes: payload length (u32 LE)]
/// [4 bytes: CRC32 of payload (u32 LE)]
/// [N bytes: bincode-serialized Object]
/// ```
///
/// Files are written to a temporary name and renamed into place, so a
/// reader never observes a partial object.
pub struct FsEngine {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsEngine {
    /// Open (creating if needed) an engine rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(GRAVEYARD_DIR))?;
        debug!(root = %root.display(), "opened filesystem engine");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, address: &Address) -> PathBuf {
        self.root
            .join(address.container.to_hex())
            .join(address.object.to_hex())
    }

    fn grave_path(&self, address: &Address) -> PathBuf {
        self.root
            .join(GRAVEYARD_DIR)
            .join(address.container.to_hex())
            .join(address.object.to_hex())
    }

    fn is_removed(&self, address: &Address) -> bool {
        self.grave_path(address).exists()
    }

    fn read_object(&self, address: &Address) -> StoreResult<Object> {
        let bytes = match fs::read(self.object_path(address)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*address))
            }
            Err(e) => return Err(e.into()),
        };
        decode_frame(address, &bytes)
    }

    fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl StorageEngine for FsEngine {
    fn put(&self, object: &Object) -> StoreResult<()> {
        let address = object.address();
        let path = self.object_path(&address);
        let _guard = self.write_lock.lock().expect("lock poisoned");
        if path.exists() {
            return Ok(());
        }
        let frame = encode_frame(object)?;
        Self::write_atomic(&path, &frame)?;
        debug!(%address, bytes = frame.len(), "object written");
        Ok(())
    }

    fn get(&self, address: &Address) -> StoreResult<Object> {
        if self.is_removed(address) {
            return Err(StoreError::AlreadyRemoved(*address));
        }
        self.read_object(address)
    }

    fn head(&self, address: &Address, raw: bool) -> StoreResult<HeaderView> {
        if !raw && self.is_removed(address) {
            return Err(StoreError::AlreadyRemoved(*address));
        }
        Ok(self.read_object(address)?.header_view())
    }

    fn select(
        &self,
        container: &ContainerId,
        filters: &[SearchFilter],
    ) -> StoreResult<Vec<ObjectId>> {
        let dir = self.root.join(container.to_hex());
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            // Temporary files and stray names never parse as ids.
            let Some(id) = name.to_str().and_then(|n| ObjectId::from_hex(n).ok()) else {
                continue;
            };
            let address = Address::new(*container, id);
            if self.is_removed(&address) {
                continue;
            }
            let object = self.read_object(&address)?;
            if matches_all(filters, &object.header) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn inhume(&self, tombstone: &Address, targets: &[Address]) -> StoreResult<()> {
        let _guard = self.write_lock.lock().expect("lock poisoned");
        let marker = tombstone.to_string();
        for target in targets {
            Self::write_atomic(&self.grave_path(target), marker.as_bytes())?;
        }
        debug!(%tombstone, count = targets.len(), "objects inhumed");
        Ok(())
    }
}

impl std::fmt::Debug for FsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsEngine").field("root", &self.root).finish()
    }
}

fn encode_frame(object: &Object) -> StoreResult<Vec<u8>> {
    let payload = bincode::serialize(object)?;
    let length = u32::try_from(payload.len())
        .map_err(|_| StoreError::Serialization("object exceeds 4 GiB frame".into()))?;
    let crc = crc32fast::hash(&payload);

    let mut frame = Vec::with_capacity(FRAME_HEADER + payload.len());
    frame.extend_from_slice(&length.to_le_bytes());
    frame.extend_from_slice(&crc.to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

fn decode_frame(address: &Address, bytes: &[u8]) -> StoreResult<Object> {
    let corrupt = |reason: String| {
        warn!(%address, %reason, "corrupt object file");
        StoreError::Corrupt {
            address: *address,
            reason,
        }
    };

    if bytes.len() < FRAME_HEADER {
        return Err(corrupt(format!("truncated frame ({} bytes)", bytes.len())));
    }
    let length = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let expected_crc = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let payload = &bytes[FRAME_HEADER..];
    if payload.len() != length {
        return Err(corrupt(format!(
            "length mismatch: header says {length}, file has {}",
            payload.len()
        )));
    }
    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(corrupt(format!(
            "CRC mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"
        )));
    }
    let object: Object = bincode::deserialize(payload)?;
    if object.address() != *address {
        return Err(corrupt(format!("file holds {}", object.address())));
    }
    Ok(object)
}
