use alloc::string::String;

use derive_more::Display;

use crate::ClusterError;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Error {
    /// 未提供引导程序，整个构建中止
    #[display(fmt = "boot loader image is missing")]
    MissingInput,

    /// 引导程序超过一个扇区
    #[display(fmt = "boot loader is {} bytes, larger than one sector", size)]
    BootLoaderOversized { size: usize },

    #[display(fmt = "data file {:?} not supplied", name)]
    DataFileAbsent { name: String },

    /// 根目录没有空闲的目录项
    #[display(fmt = "root directory is full, cannot add {:?}", name)]
    DirectoryFull { name: String },

    /// 簇编号对应的表项超出FAT缓冲区
    #[display(fmt = "cluster {:#x} lies outside the FAT (byte offset {})", cluster, offset)]
    FatRange { cluster: u16, offset: usize },

    /// 数据区放不下整条簇链
    #[display(fmt = "data area cannot hold {} clusters for {:?}", clusters, name)]
    DiskFull { name: String, clusters: usize },

    #[display(fmt = "invalid cluster: {:?}", _0)]
    Cluster(ClusterError),
}

impl From<ClusterError> for Error {
    fn from(e: ClusterError) -> Self {
        Self::Cluster(e)
    }
}

impl core::error::Error for Error {}
