//! 镜像的组装

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::allocator::ClusterAllocator;
use crate::sector;
use crate::volume::data::{DataArea, ShortDirEntry};
use crate::volume::fat::FatArea;
use crate::volume::root::RootDir;
use crate::volume::{Geometry, Layout};
use crate::{Error, SectorId};

/// 待写入镜像的文件
#[derive(Debug, Clone)]
pub struct FileSource {
    pub name: String,
    /// 原样写入目录项的属性字节
    pub attr: u8,
    /// `None`表示调用方没能提供该文件
    pub content: Option<Vec<u8>>,
}

/// 没能写入镜像的文件及原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub name: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct ImageBuilder {
    geometry: Geometry,
    boot_loader: Option<Vec<u8>>,
    files: Vec<FileSource>,
}

impl ImageBuilder {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            boot_loader: None,
            files: Vec::new(),
        }
    }

    /// 引导程序，至多一个扇区
    pub fn boot_loader(mut self, code: impl Into<Vec<u8>>) -> Self {
        self.boot_loader = Some(code.into());
        self
    }

    /// `attr`为原始属性字节，可由[`AttrFlag`](crate::AttrFlag)组合，
    /// 也可以带有其中没有定义的位
    pub fn file(self, name: impl Into<String>, attr: u8, content: impl Into<Vec<u8>>) -> Self {
        self.optional_file(name, attr, Some(content.into()))
    }

    /// 按添加顺序分配簇与目录项
    pub fn optional_file(
        mut self,
        name: impl Into<String>,
        attr: u8,
        content: Option<Vec<u8>>,
    ) -> Self {
        self.files.push(FileSource {
            name: name.into(),
            attr,
            content,
        });
        self
    }

    /// 生成整个镜像。
    ///
    /// 缺少引导程序时直接失败；单个文件的问题只会跳过该文件，记录在[`DiskImage::skipped`]中。
    pub fn build(self) -> Result<DiskImage, Error> {
        let geometry = self.geometry;
        let boot_loader = self.boot_loader.ok_or(Error::MissingInput)?;
        if boot_loader.len() > geometry.sector_bytes {
            return Err(Error::BootLoaderOversized {
                size: boot_loader.len(),
            });
        }

        let layout = geometry.layout();
        log::debug!("{layout:?}");

        let mut data = vec![0; geometry.image_bytes()];
        let boot_start = layout.boot.offset(geometry.sector_bytes);
        data[boot_start..boot_start + boot_loader.len()].copy_from_slice(&boot_loader);

        let mut fats = FatArea::new(&geometry);
        let mut root = RootDir::new(&geometry);
        let mut allocator = ClusterAllocator::new();
        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        {
            let range = sector::byte_range(&layout.data_area, geometry.sector_bytes);
            let mut data_area = DataArea::new(&layout, &mut data[range]);

            for file in self.files {
                match Self::add_file(&file, &mut root, &mut allocator, &mut fats, &mut data_area) {
                    Ok(entry) => {
                        log::debug!(
                            "added {:?}: first cluster {:#x}, {} bytes",
                            file.name,
                            entry.cluster_id().raw(),
                            entry.size()
                        );
                        entries.push(entry);
                    }
                    Err(error) => {
                        log::warn!("skipped {:?}: {error}", file.name);
                        skipped.push(Skipped {
                            name: file.name,
                            error,
                        });
                    }
                }
            }
        }

        let range = sector::byte_range(&layout.root_dir, geometry.sector_bytes);
        data[range].copy_from_slice(root.as_bytes());
        for (i, table) in fats.tables().iter().enumerate() {
            let range = sector::byte_range(&layout.fat(i), geometry.sector_bytes);
            data[range].copy_from_slice(table.as_bytes());
        }

        Ok(DiskImage {
            data,
            layout,
            entries,
            skipped,
        })
    }

    fn add_file(
        file: &FileSource,
        root: &mut RootDir,
        allocator: &mut ClusterAllocator,
        fats: &mut FatArea,
        data: &mut DataArea<'_>,
    ) -> Result<ShortDirEntry, Error> {
        let content = file.content.as_deref().ok_or_else(|| Error::DataFileAbsent {
            name: file.name.clone(),
        })?;
        // 先确认目录有空位，免得留下无主的簇链
        if root.is_full() {
            return Err(Error::DirectoryFull {
                name: file.name.clone(),
            });
        }

        let id = allocator.allocate(&file.name, content, fats, data)?;
        // 能放进数据区的文件大小不会超过u32
        let entry = ShortDirEntry::new_file(&file.name, file.attr, id, content.len() as u32);
        if let Some(index) = root.find(&entry.short_name()) {
            log::warn!(
                "{:?} has the same 8.3 name as root entry {index}, only the first is reachable",
                file.name
            );
        }
        root.push(&entry).ok_or_else(|| Error::DirectoryFull {
            name: file.name.clone(),
        })?;
        Ok(entry)
    }
}

/// 构建完成的镜像
#[derive(Debug)]
pub struct DiskImage {
    data: Vec<u8>,
    layout: Layout,
    entries: Vec<ShortDirEntry>,
    skipped: Vec<Skipped>,
}

impl DiskImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// 按写入顺序排列的目录项
    pub fn entries(&self) -> &[ShortDirEntry] {
        &self.entries
    }

    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    /// 镜像中某个扇区的内容
    pub fn sector(&self, id: SectorId) -> &[u8] {
        let start = id.offset(self.layout.sector_bytes());
        &self.data[start..start + self.layout.sector_bytes()]
    }
}
