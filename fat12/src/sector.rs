//! 扇区编号

use core::ops::Range;

use derive_more::{Add, From, Into};

/// 磁盘上的线性扇区号（LBA）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add, From, Into)]
#[repr(transparent)]
pub struct SectorId(usize);

impl core::ops::Add<usize> for SectorId {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        self + Self(rhs)
    }
}

impl SectorId {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// 扇区在镜像中的起始字节
    pub const fn offset(self, sector_bytes: usize) -> usize {
        self.0 * sector_bytes
    }
}

/// 将扇区范围换算为镜像中的字节范围
pub fn byte_range(sectors: &Range<SectorId>, sector_bytes: usize) -> Range<usize> {
    sectors.start.offset(sector_bytes)..sectors.end.offset(sector_bytes)
}

/// 扇区范围的长度
pub fn sector_count(sectors: &Range<SectorId>) -> usize {
    sectors.end.0 - sectors.start.0
}
