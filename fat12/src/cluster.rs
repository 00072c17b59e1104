/// FAT12簇编号，只有低12位有效
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClusterId(u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterError {
    Free,
    Defective,
    Reserved,
    Eof,
}

impl From<u16> for ClusterId {
    fn from(raw: u16) -> Self {
        Self::new(raw)
    }
}

impl From<ClusterId> for u16 {
    fn from(id: ClusterId) -> Self {
        id.0
    }
}

impl From<ClusterId> for usize {
    fn from(id: ClusterId) -> Self {
        id.0 as usize
    }
}

impl core::ops::Add<u16> for ClusterId {
    type Output = Self;

    fn add(self, rhs: u16) -> Self::Output {
        Self::new(self.0 + rhs)
    }
}

impl core::ops::Sub for ClusterId {
    type Output = u16;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0 - rhs.0
    }
}

impl ClusterId {
    pub const MASK: u16 = 0x0FFF;

    pub const FREE: Self = Self(0);

    /// 最小的可用簇号
    pub const MIN: Self = Self(2);

    /// 最大的可用簇号，再往上是保留值
    pub const MAX: Self = Self(0x0FEF);

    pub const BAD: Self = Self(0x0FF7);

    /// End of chain
    pub const EOF: Self = Self(0x0FFF);

    pub const fn new(raw: u16) -> Self {
        Self(raw & Self::MASK)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub fn is_unavailable(&self) -> bool {
        *self < Self::MIN || *self > Self::MAX
    }

    pub fn validate(self) -> Result<Self, ClusterError> {
        match self {
            ClusterId::FREE => Err(ClusterError::Free),
            ClusterId::BAD => Err(ClusterError::Defective),
            // 0xFF8..=0xFFF都表示链尾
            id if id.0 >= 0x0FF8 => Err(ClusterError::Eof),
            id if id.is_unavailable() => Err(ClusterError::Reserved),
            id => Ok(id),
        }
    }
}
