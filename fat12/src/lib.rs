//! FAT12软盘镜像的生成
//!
//! 引导扇区 | FAT1 | FAT2 | 根目录 | 数据区

#![no_std]

extern crate alloc;

mod allocator;
mod cluster;
mod error;
mod image;
mod sector;
pub mod volume;

pub use self::{
    allocator::ClusterAllocator,
    cluster::{ClusterError, ClusterId},
    error::Error,
    image::{DiskImage, FileSource, ImageBuilder, Skipped},
    sector::SectorId,
    volume::{
        Geometry, Layout, Media,
        data::{AttrFlag, ShortDirEntry},
    },
};
