mod dir_entry;

use core::ops::Range;

pub use self::dir_entry::*;
use crate::volume::Layout;
use crate::{ClusterError, ClusterId, SectorId};

/// 镜像中的数据区，使用**簇编号**索引
#[derive(Debug)]
pub struct DataArea<'a> {
    range: Range<SectorId>,
    cluster_sectors: usize,
    sector_bytes: usize,
    /// 数据区在镜像中的字节
    bytes: &'a mut [u8],
}

impl<'a> DataArea<'a> {
    /// `bytes`须恰好是镜像中`layout.data_area`对应的部分
    pub fn new(layout: &Layout, bytes: &'a mut [u8]) -> Self {
        Self {
            range: layout.data_area.clone(),
            cluster_sectors: layout.cluster_sectors(),
            sector_bytes: layout.sector_bytes(),
            bytes,
        }
    }

    pub const fn cluster_bytes(&self) -> usize {
        self.cluster_sectors * self.sector_bytes
    }

    /// 存放`len`字节需要的簇数
    pub const fn clusters_for(&self, len: usize) -> usize {
        len.div_ceil(self.cluster_bytes())
    }

    /// 数据区能容纳的簇数
    pub fn cluster_count(&self) -> usize {
        self.bytes.len() / self.cluster_bytes()
    }

    /// 数据区中最后一个簇的编号
    pub fn last_cluster(&self) -> usize {
        usize::from(ClusterId::MIN) + self.cluster_count() - 1
    }

    /// 返回簇编号指向的一系列扇区
    ///
    /// 数据区不占有`ClusterId::MIN`前面的簇，所以需要转换计算得到索引指向的扇区。
    pub fn cluster(&self, id: ClusterId) -> Result<Range<SectorId>, ClusterError> {
        let id = id.validate()?;
        let start = self.range.start + usize::from(id - ClusterId::MIN) * self.cluster_sectors;
        if start >= self.range.end {
            return Err(ClusterError::Reserved);
        }
        let end = (start + self.cluster_sectors).min(self.range.end);
        Ok(start..end)
    }

    /// 把`chunk`写入簇`id`，不足一簇的部分填0
    pub fn write(&mut self, id: ClusterId, chunk: &[u8]) -> Result<(), ClusterError> {
        let sectors = self.cluster(id)?;
        let start = (sectors.start.get() - self.range.start.get()) * self.sector_bytes;
        let end = (sectors.end.get() - self.range.start.get()) * self.sector_bytes;

        let cluster = &mut self.bytes[start..end];
        if chunk.len() > cluster.len() {
            return Err(ClusterError::Reserved);
        }
        let (data, padding) = cluster.split_at_mut(chunk.len());
        data.copy_from_slice(chunk);
        padding.fill(0);

        log::trace!("cluster {:#x} <- {} bytes at sector {:?}", id.raw(), chunk.len(), sectors.start);
        Ok(())
    }
}
