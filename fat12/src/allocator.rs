use crate::volume::data::DataArea;
use crate::volume::fat::FatArea;
use crate::{ClusterId, Error};

/// 簇分配器
///
/// 从[`ClusterId::MIN`]开始顺序分配，只增不减，
/// 同一次构建中不同文件的簇链绝不重叠。
#[derive(Debug)]
pub struct ClusterAllocator {
    next: ClusterId,
}

impl Default for ClusterAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterAllocator {
    pub const fn new() -> Self {
        Self {
            next: ClusterId::MIN,
        }
    }

    /// 下一个将被分配的簇
    pub const fn peek(&self) -> ClusterId {
        self.next
    }

    /// 为`content`分配簇链，写入数据区并在每份FAT中链接起来，返回首簇编号。
    ///
    /// 空文件不占用簇，返回[`ClusterId::FREE`]。
    /// 出错时不写入任何内容，分配器状态也不变。
    pub fn allocate(
        &mut self,
        name: &str,
        content: &[u8],
        fats: &mut FatArea,
        data: &mut DataArea<'_>,
    ) -> Result<ClusterId, Error> {
        let count = data.clusters_for(content.len());
        if count == 0 {
            return Ok(ClusterId::FREE);
        }

        let first = self.next;
        let last = usize::from(first) + count - 1;
        if last > data.last_cluster() || last > usize::from(ClusterId::MAX) {
            return Err(Error::DiskFull {
                name: name.into(),
                clusters: count,
            });
        }
        // last不超过ClusterId::MAX，转换不会截断
        fats.check(ClusterId::new(last as u16))?;

        for (i, chunk) in content.chunks(data.cluster_bytes()).enumerate() {
            let id = first + i as u16;
            let next = if i + 1 == count {
                ClusterId::EOF
            } else {
                id + 1
            };

            data.write(id, chunk)?;
            fats.set(id, next)?;
        }

        self.next = first + count as u16;
        log::debug!(
            "{name:?}: {} bytes in clusters {:#x}..={:#x}",
            content.len(),
            first.raw(),
            last
        );
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::ClusterAllocator;
    use crate::volume::data::DataArea;
    use crate::volume::fat::FatArea;
    use crate::volume::Geometry;
    use crate::{ClusterId, Error};

    #[test]
    fn empty_file_takes_no_cluster() {
        let geometry = Geometry::FLOPPY_1440K;
        let layout = geometry.layout();
        let mut bytes = vec![0; 2847 * 512];
        let mut data = DataArea::new(&layout, &mut bytes);
        let mut fats = FatArea::new(&geometry);
        let mut allocator = ClusterAllocator::new();

        assert_eq!(
            Ok(ClusterId::FREE),
            allocator.allocate("EMPTY", &[], &mut fats, &mut data)
        );
        assert_eq!(ClusterId::MIN, allocator.peek());
    }

    #[test]
    fn chains_are_sequential() {
        let geometry = Geometry::FLOPPY_1440K;
        let layout = geometry.layout();
        let mut bytes = vec![0; 2847 * 512];
        let mut data = DataArea::new(&layout, &mut bytes);
        let mut fats = FatArea::new(&geometry);
        let mut allocator = ClusterAllocator::new();

        let a = allocator
            .allocate("A", &[1; 513], &mut fats, &mut data)
            .unwrap();
        let b = allocator
            .allocate("B", &[2; 512], &mut fats, &mut data)
            .unwrap();

        assert_eq!(ClusterId::new(2), a);
        assert_eq!(ClusterId::new(4), b);
        assert_eq!(ClusterId::new(5), allocator.peek());
        assert_eq!(
            vec![ClusterId::new(2), ClusterId::new(3)],
            fats.chain(a).unwrap()
        );
        assert_eq!(vec![ClusterId::new(4)], fats.chain(b).unwrap());
        assert_eq!(3, fats.tables()[1].get(2).unwrap());
        assert_eq!(0xFFF, fats.tables()[1].get(3).unwrap());

        assert_eq!(1, bytes[0]);
        assert_eq!(1, bytes[512]);
        assert_eq!(0, bytes[513]);
        assert_eq!(2, bytes[1024]);
    }

    #[test]
    fn rejects_chain_beyond_data_area() {
        let geometry = Geometry {
            total_sectors: 36,
            ..Geometry::FLOPPY_1440K
        };
        let layout = geometry.layout();
        let mut bytes = vec![0; 3 * 512];
        let mut data = DataArea::new(&layout, &mut bytes);
        let mut fats = FatArea::new(&geometry);
        let mut allocator = ClusterAllocator::new();

        assert_eq!(
            Err(Error::DiskFull {
                name: "BIG".into(),
                clusters: 4
            }),
            allocator.allocate("BIG", &[7; 4 * 512], &mut fats, &mut data)
        );
        assert_eq!(ClusterId::MIN, allocator.peek());
        assert_eq!(0, fats.tables()[0].get(2).unwrap());

        let id = allocator
            .allocate("FITS", &[7; 3 * 512], &mut fats, &mut data)
            .unwrap();
        assert_eq!(3, fats.chain(id).unwrap().len());
    }

    #[test]
    fn rejects_chain_beyond_fat() {
        // 一个扇区的FAT最大表项号为340，数据区却有更多簇
        let geometry = Geometry {
            fat_sectors: 1,
            ..Geometry::FLOPPY_1440K
        };
        let layout = geometry.layout();
        let mut bytes = vec![0; (2880 - 17) * 512];
        let mut data = DataArea::new(&layout, &mut bytes);
        let mut fats = FatArea::new(&geometry);
        let mut allocator = ClusterAllocator::new();

        let result = allocator.allocate("BIG", &[7; 400 * 512], &mut fats, &mut data);
        assert!(matches!(result, Err(Error::FatRange { cluster: 401, .. })));
        assert_eq!(ClusterId::MIN, allocator.peek());
        assert!(bytes.iter().all(|&b| b == 0));
    }
}
