//! 根目录区(FAT12/16)
//!
//! 紧跟在FAT区之后，大小固定，不占用簇。

use alloc::vec;
use alloc::vec::Vec;

use crate::volume::data::{DIR_ENTRY_SIZE, ShortDirEntry};
use crate::volume::Geometry;

#[derive(Debug)]
pub struct RootDir {
    /// 整个根目录区的字节，未用的目录项全为0
    bytes: Vec<u8>,
    capacity: usize,
    len: usize,
}

impl RootDir {
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            bytes: vec![0; geometry.root_dir_sectors() * geometry.sector_bytes],
            capacity: geometry.root_entries,
            len: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 把目录项放进下一个空闲位置，返回其序号；已满则返回`None`
    pub fn push(&mut self, entry: &ShortDirEntry) -> Option<usize> {
        if self.is_full() {
            return None;
        }

        let index = self.len;
        let offset = index * DIR_ENTRY_SIZE;
        self.bytes[offset..offset + DIR_ENTRY_SIZE].copy_from_slice(&entry.to_bytes());
        self.len += 1;
        Some(index)
    }

    /// 已占用的目录项中，8.3名称为`short_name`的第一个的序号
    pub fn find(&self, short_name: &[u8; 11]) -> Option<usize> {
        self.bytes[..self.len * DIR_ENTRY_SIZE]
            .chunks_exact(DIR_ENTRY_SIZE)
            .position(|entry| entry[..11] == short_name[..])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
