use super::allocator::DatumAllocatorEvent;
use super::script::ScriptInstanceId;
use super::ALLOCATOR_TX;

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ScriptInstanceRef(ScriptInstanceId);

impl ScriptInstanceRef {
    #[inline]
    pub fn from_id(id: ScriptInstanceId) -> Self {
        ALLOCATOR_TX.with(|tx| {
            if let Some(tx) = tx.borrow().as_ref() {
                let _ = tx.send(DatumAllocatorEvent::ScriptInstanceRefAdded(id));
            }
        });
        Self(id)
    }

    #[inline]
    pub fn id(&self) -> ScriptInstanceId {
        self.0
    }
}

impl std::ops::Deref for ScriptInstanceRef {
    type Target = ScriptInstanceId;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Clone for ScriptInstanceRef {
    fn clone(&self) -> Self {
        Self::from_id(self.0)
    }
}

impl Drop for ScriptInstanceRef {
    fn drop(&mut self) {
        ALLOCATOR_TX.with(|tx| {
            if let Some(tx) = tx.borrow().as_ref() {
                let _ = tx.send(DatumAllocatorEvent::ScriptInstanceRefDropped(self.0));
            }
        });
    }
}

impl std::fmt::Display for ScriptInstanceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
