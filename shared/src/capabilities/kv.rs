use crate::persistence::{ReportSlot, SlotError, MAX_VALUE_SIZE};

/// Write-behind slot backed by the shell's key-value store.
///
/// The KeyValue capability is asynchronous, so this slot holds the bytes the
/// shell returned on startup and buffers the latest write until the app
/// turns it into a `set` request.
#[derive(Debug, Clone, Default)]
pub struct KvSlot {
    current: Option<Vec<u8>>,
    dirty: bool,
}

impl KvSlot {
    pub fn restored(bytes: Option<Vec<u8>>) -> Self {
        Self {
            current: bytes,
            dirty: false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.dirty
    }

    /// The bytes to send to the shell, once per write.
    pub fn take_pending(&mut self) -> Option<Vec<u8>> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.current.clone()
    }
}

impl ReportSlot for KvSlot {
    fn read(&self) -> Result<Option<Vec<u8>>, SlotError> {
        Ok(self.current.clone())
    }

    fn write(&mut self, bytes: Vec<u8>) -> Result<(), SlotError> {
        if bytes.len() > MAX_VALUE_SIZE {
            return Err(SlotError::ValueTooLarge {
                size: bytes.len(),
                max: MAX_VALUE_SIZE,
            });
        }
        self.current = Some(bytes);
        self.dirty = true;
        Ok(())
    }
}
