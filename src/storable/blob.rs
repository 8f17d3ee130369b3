use std::borrow::Cow;

use super::{ObjectKind, Storable};

pub struct Blob {
    data: Vec<u8>,
}

impl Storable for Blob {
    const KIND: ObjectKind = ObjectKind::Blob;

    fn payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.data)
    }
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}
