//! FAT区
//!
//! FAT12的每个表项占12位，相邻两项共用3个字节：
//! 第N项位于字节偏移`N + N/2`处的16位小端字中，
//! 偶数项占低12位，奇数项占高12位。

use alloc::vec;
use alloc::vec::Vec;

use crate::volume::Geometry;
use crate::{ClusterError, ClusterId, Error};

/// 表项所在16位字的字节偏移，越界则报错
fn entry_offset(table: &[u8], cluster: u16) -> Result<usize, Error> {
    let offset = cluster as usize + cluster as usize / 2;
    if offset + 1 >= table.len() {
        return Err(Error::FatRange { cluster, offset });
    }
    Ok(offset)
}

/// 读取第`cluster`项
pub fn read_entry(table: &[u8], cluster: u16) -> Result<u16, Error> {
    let offset = entry_offset(table, cluster)?;
    let packed = u16::from_le_bytes([table[offset], table[offset + 1]]);

    Ok(if cluster % 2 == 0 {
        packed & 0x0FFF
    } else {
        packed >> 4
    })
}

/// 写入第`cluster`项，`value`只取低12位。
/// 与之共用字节的相邻表项保持不变。
pub fn write_entry(table: &mut [u8], cluster: u16, value: u16) -> Result<(), Error> {
    let offset = entry_offset(table, cluster)?;
    let packed = u16::from_le_bytes([table[offset], table[offset + 1]]);
    let value = value & 0x0FFF;

    let packed = if cluster % 2 == 0 {
        (packed & 0xF000) | value
    } else {
        (packed & 0x000F) | (value << 4)
    };

    table[offset..offset + 2].copy_from_slice(&packed.to_le_bytes());
    Ok(())
}

/// 一份FAT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatTable {
    bytes: Vec<u8>,
}

impl FatTable {
    /// 创建空表，并写好0、1两个保留项
    pub fn new(geometry: &Geometry) -> Self {
        let mut bytes = vec![0; geometry.fat_bytes()];
        for (b, r) in bytes.iter_mut().zip(Self::reserved(geometry.media as u16)) {
            *b = r;
        }
        Self { bytes }
    }

    /// 0号项为`0xF00 | media`，1号项为链尾标记
    const fn reserved(media: u16) -> [u8; 3] {
        let media = 0x0F00 | media;
        let eof = ClusterId::EOF.raw();
        [
            media as u8,
            (media >> 8) as u8 | ((eof & 0x000F) << 4) as u8,
            (eof >> 4) as u8,
        ]
    }

    pub fn get(&self, cluster: u16) -> Result<u16, Error> {
        read_entry(&self.bytes, cluster)
    }

    pub fn set(&mut self, cluster: u16, value: u16) -> Result<(), Error> {
        write_entry(&mut self.bytes, cluster, value)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// 所有FAT副本，写入时同步更新每一份
#[derive(Debug)]
pub struct FatArea {
    tables: Vec<FatTable>,
}

impl FatArea {
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            tables: vec![FatTable::new(geometry); geometry.fat_count],
        }
    }

    /// 检查`id`的表项是否落在FAT内
    pub fn check(&self, id: ClusterId) -> Result<(), Error> {
        match self.tables.first() {
            Some(table) => entry_offset(table.as_bytes(), id.raw()).map(drop),
            None => Ok(()),
        }
    }

    /// 把`id`的表项设为`value`
    pub fn set(&mut self, id: ClusterId, value: ClusterId) -> Result<(), Error> {
        self.check(id)?;
        for table in &mut self.tables {
            table.set(id.raw(), value.raw())?;
        }
        Ok(())
    }

    /// 获取下一个簇编号。
    /// `Ok(None)`表示`id`为链表上最后一个簇。
    pub fn next(&self, id: ClusterId) -> Result<Option<ClusterId>, Error> {
        let id = id.validate()?;
        let table = self.tables.first().ok_or(ClusterError::Reserved)?;

        match ClusterId::new(table.get(id.raw())?).validate() {
            Ok(next) => Ok(Some(next)),
            Err(ClusterError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 自`first`起的整条簇链
    pub fn chain(&self, first: ClusterId) -> Result<Vec<ClusterId>, Error> {
        let mut chain = Vec::new();
        if first == ClusterId::FREE {
            return Ok(chain);
        }

        let mut id = first;
        loop {
            // 链上出现环
            if chain.len() > usize::from(ClusterId::MAX) {
                return Err(ClusterError::Defective.into());
            }
            chain.push(id);
            match self.next(id)? {
                Some(next) => id = next,
                None => break,
            }
        }
        Ok(chain)
    }

    pub fn tables(&self) -> &[FatTable] {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{read_entry, write_entry, FatArea, FatTable};
    use crate::volume::Geometry;
    use crate::{ClusterId, Error};

    #[test]
    fn even_entry_keeps_odd_neighbour() {
        let mut table = vec![0u8; 6];
        write_entry(&mut table, 3, 0xABC).unwrap();
        write_entry(&mut table, 2, 0x123).unwrap();

        assert_eq!(0x123, read_entry(&table, 2).unwrap());
        assert_eq!(0xABC, read_entry(&table, 3).unwrap());
        assert_eq!([0x23, 0xC1, 0xAB], table[3..6]);
    }

    #[test]
    fn odd_entry_keeps_even_neighbour() {
        let mut table = vec![0u8; 6];
        write_entry(&mut table, 0, 0xFF0).unwrap();
        write_entry(&mut table, 1, 0xFFF).unwrap();

        assert_eq!([0xF0, 0xFF, 0xFF], table[..3]);
        assert_eq!(0xFF0, read_entry(&table, 0).unwrap());

        write_entry(&mut table, 1, 0x005).unwrap();
        assert_eq!(0xFF0, read_entry(&table, 0).unwrap());
        assert_eq!(0x005, read_entry(&table, 1).unwrap());
    }

    #[test]
    fn value_is_masked() {
        let mut table = vec![0u8; 6];
        for cluster in 0..4 {
            write_entry(&mut table, cluster, 0xF000 | cluster).unwrap();
        }
        for cluster in 0..4 {
            assert_eq!(cluster, read_entry(&table, cluster).unwrap());
        }
    }

    #[test]
    fn out_of_range() {
        let mut table = vec![0u8; 6];
        // 3 + 1 = 4 < 6
        assert!(write_entry(&mut table, 3, 1).is_ok());
        // 4 + 2 = 6，16位字放不下
        assert_eq!(
            Err(Error::FatRange {
                cluster: 4,
                offset: 6
            }),
            write_entry(&mut table, 4, 1)
        );
        assert_eq!(
            Err(Error::FatRange {
                cluster: 4,
                offset: 6
            }),
            read_entry(&table, 4)
        );
        assert_eq!([0u8, 0, 0, 0, 0x10, 0], table[..]);
    }

    #[test]
    fn reserved_entries() {
        let table = FatTable::new(&Geometry::FLOPPY_1440K);
        assert_eq!(9 * 512, table.as_bytes().len());
        assert_eq!(0xFF0, table.get(0).unwrap());
        assert_eq!(0xFFF, table.get(1).unwrap());
        assert_eq!(0, table.get(2).unwrap());
    }

    #[test]
    fn mirrored_chain() {
        let mut fats = FatArea::new(&Geometry::FLOPPY_1440K);
        fats.set(ClusterId::new(2), ClusterId::new(3)).unwrap();
        fats.set(ClusterId::new(3), ClusterId::EOF).unwrap();

        assert_eq!(2, fats.tables().len());
        assert_eq!(fats.tables()[0], fats.tables()[1]);
        assert_eq!(
            vec![ClusterId::new(2), ClusterId::new(3)],
            fats.chain(ClusterId::new(2)).unwrap()
        );
        assert_eq!(None, fats.next(ClusterId::new(3)).unwrap());
        assert!(fats.chain(ClusterId::FREE).unwrap().is_empty());
    }

    #[test]
    fn rejected_write_leaves_tables_untouched() {
        let mut fats = FatArea::new(&Geometry::FLOPPY_1440K);
        let before = fats.tables()[0].clone();

        // 9 * 512 = 4608字节，最大表项号为3071
        let id = ClusterId::new(3072);
        assert!(matches!(
            fats.set(id, ClusterId::EOF),
            Err(Error::FatRange { cluster: 3072, .. })
        ));
        assert_eq!(before, fats.tables()[0]);
        assert_eq!(before, fats.tables()[1]);
    }
}
