//! Render and KeyValue are used as Crux provides them; the shell owns the
//! actual rendering and the durable key-value store.

mod kv;

pub use self::kv::KvSlot;

pub use crux_core::render::Render;
pub use crux_kv::KeyValue;

use crux_core::macros::Effect;

use crate::event::Event;

#[derive(Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub key_value: KeyValue<Event>,
}
