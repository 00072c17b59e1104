//! 卷的布局
//!
//! 保留区(引导扇区) | FAT区 | 根目录 | 数据区

pub mod data;
pub mod fat;
pub mod root;

use core::fmt;
use core::ops::Range;

use crate::sector::{self, SectorId};

/// 物理媒介的类型，写入0号FAT表项的低8位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Media {
    Fixed = 0xF8,
    Removable = 0xF0,
}

/// 卷的静态参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// 卷的扇区总数
    pub total_sectors: usize,
    /// 保留区的扇区数，引导扇区位于其中第一个
    pub reserved_sectors: usize,
    /// 一张FAT占用的扇区数
    pub fat_sectors: usize,
    /// FAT的份数，内容完全相同
    pub fat_count: usize,
    /// 根目录最多容纳的目录项数
    pub root_entries: usize,
    pub cluster_sectors: usize,
    pub sector_bytes: usize,
    pub dir_entry_bytes: usize,
    pub media: Media,
}

impl Geometry {
    /// 1.44MB 3.5英寸软盘
    pub const FLOPPY_1440K: Self = Self {
        total_sectors: 2880,
        reserved_sectors: 1,
        fat_sectors: 9,
        fat_count: 2,
        root_entries: 224,
        cluster_sectors: 1,
        sector_bytes: 512,
        dir_entry_bytes: 32,
        media: Media::Removable,
    };

    /// 根目录占用的扇区数，向上取整
    pub const fn root_dir_sectors(&self) -> usize {
        (self.root_entries * self.dir_entry_bytes).div_ceil(self.sector_bytes)
    }

    pub const fn fat_bytes(&self) -> usize {
        self.fat_sectors * self.sector_bytes
    }

    pub const fn cluster_bytes(&self) -> usize {
        self.cluster_sectors * self.sector_bytes
    }

    pub const fn image_bytes(&self) -> usize {
        self.total_sectors * self.sector_bytes
    }

    pub const fn layout(&self) -> Layout {
        let boot = SectorId::new(0);
        let fat_start = self.reserved_sectors;
        let root_start = fat_start + self.fat_count * self.fat_sectors;
        let data_start = root_start + self.root_dir_sectors();

        Layout {
            boot,
            fat_area: SectorId::new(fat_start)..SectorId::new(root_start),
            fat_sectors: self.fat_sectors,
            root_dir: SectorId::new(root_start)..SectorId::new(data_start),
            data_area: SectorId::new(data_start)..SectorId::new(self.total_sectors),
            sector_bytes: self.sector_bytes,
            cluster_sectors: self.cluster_sectors,
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::FLOPPY_1440K
    }
}

/// 各区域的绝对扇区号，由[`Geometry::layout`]算出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub boot: SectorId,
    /// 所有FAT副本，首尾相接
    pub fat_area: Range<SectorId>,
    fat_sectors: usize,
    pub root_dir: Range<SectorId>,
    /// 2号簇即数据区的首扇区
    pub data_area: Range<SectorId>,
    sector_bytes: usize,
    cluster_sectors: usize,
}

impl Layout {
    /// 第`index`份FAT（0起）占据的扇区
    pub fn fat(&self, index: usize) -> Range<SectorId> {
        let start = self.fat_area.start + index * self.fat_sectors;
        start..start + self.fat_sectors
    }

    pub fn fat_count(&self) -> usize {
        sector::sector_count(&self.fat_area) / self.fat_sectors
    }

    pub fn root_dir_sectors(&self) -> usize {
        sector::sector_count(&self.root_dir)
    }

    pub const fn sector_bytes(&self) -> usize {
        self.sector_bytes
    }

    pub const fn cluster_sectors(&self) -> usize {
        self.cluster_sectors
    }

    /// 供引导程序汇编使用的`equ`常量，名称与`loader.asm`中的一致
    pub fn equates(&self) -> Equates<'_> {
        Equates(self)
    }
}

/// 以NASM `equ`格式输出布局
#[derive(Debug)]
pub struct Equates<'a>(&'a Layout);

impl fmt::Display for Equates<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.0;
        writeln!(
            f,
            "CLUSTER_SIZE equ {}",
            layout.cluster_sectors * layout.sector_bytes
        )?;
        writeln!(f, "FAT_TABLE_SECTOR equ {}", layout.fat_area.start.get())?;
        writeln!(f, "ROOT_DIR_SECTOR equ {}", layout.root_dir.start.get())?;
        writeln!(f, "ROOT_DIR_SECTORS equ {}", layout.root_dir_sectors())?;
        writeln!(f, "SETOR_DE_DADOS_INICIAL equ {}", layout.data_area.start.get())
    }
}
