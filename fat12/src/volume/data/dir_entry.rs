//! 短目录项（8.3文件名）
//!
//! 根目录中的每个文件对应一个32字节的目录项，
//! 其中记录了首个簇编号，文件的其余簇沿FAT中的簇链查找。

use core::mem;

use enumflags2::{BitFlags, bitflags};

use crate::ClusterId;

pub const DIR_ENTRY_SIZE: usize = mem::size_of::<ShortDirEntry>();

const NAME_LEN: usize = 8;
const EXT_LEN: usize = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C, packed)]
pub struct ShortDirEntry {
    /// 8字节主名 + 3字节扩展名，空格填充
    name: [u8; 11],

    /// 原始属性字节，可能含有[`AttrFlag`]以外的位
    attr: u8,

    /// Reserved, must be 0
    _ntres: u8,

    /// Count of tenths of a second.
    /// Range: [0, 199]
    _crt_time_tenth: u8,

    /// Creation time, granularity is 2 seconds
    _crt_time: u16,

    /// Creation date
    _crt_date: u16,

    /// Last access date
    _lst_acc_date: u16,

    /// FAT12中恒为0
    _fst_clus_hi: u16,

    /// Last modification time
    _wrt_time: u16,

    /// Last modification date
    _wrt_date: u16,

    /// First data cluster number
    /// for file described by this entry
    fst_clus_lo: u16,

    /// Quantity containing size in bytes
    /// of file described by this entry
    file_size: u32,
}

impl ShortDirEntry {
    /// 空文件的`id`应为[`ClusterId::FREE`]
    pub fn new_file(name: &str, attr: u8, id: ClusterId, size: u32) -> Self {
        let mut dir_entry = Self {
            attr,
            file_size: size,
            ..Default::default()
        };
        dir_entry.rename(name);
        dir_entry.set_cluster_id(id);
        dir_entry
    }

    /// 主名，含填充的空格
    pub fn name(&self) -> &[u8] {
        &self.name[..NAME_LEN]
    }

    /// 扩展名，含填充的空格
    pub fn extension(&self) -> &[u8] {
        &self.name[NAME_LEN..]
    }

    /// 8.3名称的11个字节
    pub fn short_name(&self) -> [u8; 11] {
        self.name
    }

    pub fn attr(&self) -> BitFlags<AttrFlag> {
        BitFlags::from_bits_truncate(self.attr)
    }

    pub fn attr_byte(&self) -> u8 {
        self.attr
    }

    pub fn cluster_id(&self) -> ClusterId {
        ClusterId::new(self.fst_clus_lo)
    }

    pub fn set_cluster_id(&mut self, id: ClusterId) {
        self.fst_clus_lo = id.raw();
    }

    pub const fn size(&self) -> usize {
        self.file_size as usize
    }

    /// 按磁盘格式编码，多字节字段均为小端序
    pub fn to_bytes(&self) -> [u8; DIR_ENTRY_SIZE] {
        let mut bytes = [0; DIR_ENTRY_SIZE];
        bytes[0x00..0x0B].copy_from_slice(&self.name);
        bytes[0x0B] = self.attr;
        bytes[0x1A..0x1C].copy_from_slice(&{ self.fst_clus_lo }.to_le_bytes());
        bytes[0x1C..0x20].copy_from_slice(&{ self.file_size }.to_le_bytes());
        bytes
    }
}

impl ShortDirEntry {
    /// 在第一个`.`处拆出主名与扩展名，各自转大写，截断或以空格补齐
    fn rename(&mut self, name: &str) {
        let (base, ext) = match name.split_once('.') {
            Some((base, rest)) => (base, rest.split('.').next().unwrap_or_default()),
            None => (name, ""),
        };

        if base.len() > NAME_LEN || ext.len() > EXT_LEN {
            log::warn!("{name:?} doesn't fit 8.3, truncated");
        }

        let (name_field, ext_field) = self.name.split_at_mut(NAME_LEN);
        Self::fill(name_field, base);
        Self::fill(ext_field, ext);
    }

    fn fill(field: &mut [u8], part: &str) {
        field.fill(b' ');
        for (b, c) in field.iter_mut().zip(part.chars()) {
            *b = if c.is_ascii() && !c.is_ascii_control() {
                c.to_ascii_uppercase() as u8
            } else {
                log::warn!("character {c:?} isn't printable ASCII, replaced with '_'");
                b'_'
            };
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[bitflags]
#[repr(u8)]
pub enum AttrFlag {
    ReadOnly = 0b0000_0001,
    Hidden = 0b0000_0010,
    /// The corresponding file is tagged as a component of the operating system
    System = 0b0000_0100,
    /// The corresponding entry contains the volume label
    VolumeID = 0b0000_1000,
    Directory = 0b0001_0000,
    /// Indicates that properties of the associated file have been modified
    Archive = 0b0010_0000,
}
