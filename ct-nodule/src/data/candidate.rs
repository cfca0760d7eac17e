use super::BBox3d;
use crate::Idx3d;

/// 一个结节候选: 同一连通分量中的全部体素.
///
/// 体素保持分量枚举时的顺序. 候选只在单次特征提取中存在.
#[derive(Clone, Debug)]
pub struct Candidate {
    voxels: Vec<Idx3d>,
    bbox: BBox3d,
}

impl Candidate {
    /// 从行优先线性索引创建候选. `shape` 为整个体积的形状.
    /// `indices` 为空时返回 `None`.
    pub fn from_linear(indices: &[usize], (_, h_len, w_len): Idx3d) -> Option<Self> {
        let voxels: Vec<Idx3d> = indices
            .iter()
            .map(|&i| (i / (h_len * w_len), (i / w_len) % h_len, i % w_len))
            .collect();
        Self::from_voxels(voxels)
    }

    /// 从体素坐标创建候选. `voxels` 为空时返回 `None`.
    pub fn from_voxels(voxels: Vec<Idx3d>) -> Option<Self> {
        let bbox = BBox3d::from_points(voxels.iter().copied())?;
        Some(Self { voxels, bbox })
    }

    /// 候选的全部体素坐标.
    #[inline]
    pub fn voxels(&self) -> &[Idx3d] {
        &self.voxels
    }

    /// 体素个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// 候选为空? 构造保证该方法恒返回 `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// 三维包围盒.
    #[inline]
    pub fn bbox(&self) -> &BBox3d {
        &self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_linear() {
        let shape = (4, 3, 5);
        let c = Candidate::from_linear(&[2 * 15 + 5 + 4, 0], shape).unwrap();
        assert_eq!(c.voxels(), &[(2, 1, 4), (0, 0, 0)]);
        assert_eq!(c.len(), 2);
        assert_eq!(c.bbox().z.len(), 3);
        assert!(Candidate::from_linear(&[], shape).is_none());
    }
}
