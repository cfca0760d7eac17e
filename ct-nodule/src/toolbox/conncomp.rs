//! 二值图像连通分量标记.

use crate::consts::gray::is_foreground;
use crate::Idx3d;
use itertools::iproduct;
use ndarray::{ArrayView2, ArrayView3, Axis};
use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 连通规则.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Connectivity {
    /// 共面相邻. 三维为 6-邻域, 二维为 4-邻域.
    Face,

    /// 全相邻. 三维为 26-邻域, 二维为 8-邻域.
    #[default]
    Full,
}

impl Connectivity {
    /// 该规则下的 (三维) 邻居偏移量.
    fn offsets(&self) -> Vec<(isize, isize, isize)> {
        iproduct!(-1isize..=1, -1isize..=1, -1isize..=1)
            .filter(|(dz, dh, dw)| {
                let manhattan = dz.abs() + dh.abs() + dw.abs();
                match self {
                    Connectivity::Face => manhattan == 1,
                    Connectivity::Full => manhattan != 0,
                }
            })
            .collect()
    }
}

/// 对三维二值体积做连通分量标记.
///
/// # 返回值
///
/// 每个分量以行优先线性索引 (`z * h * w + r * w + c`) 的升序数组表示.
/// 分量按其首个体素在行优先扫描中出现的先后排序. 对相同输入多次调用结果一致.
pub fn components_3d(mask: ArrayView3<u8>, conn: Connectivity) -> Vec<Vec<usize>> {
    let (z_len, h_len, w_len) = mask.dim();
    let offsets = conn.offsets();
    let mut visited = vec![false; z_len * h_len * w_len];
    let linear = |(z, h, w): Idx3d| (z * h_len + h) * w_len + w;

    let mut ans = Vec::with_capacity(4);
    let mut bfs_q = VecDeque::with_capacity(16);
    for (pos, _) in mask.indexed_iter().filter(|(_, p)| is_foreground(**p)) {
        if visited[linear(pos)] {
            continue;
        }
        visited[linear(pos)] = true;
        bfs_q.push_back(pos);

        let mut this_comp = Vec::with_capacity(8);
        while let Some(cur @ (z, h, w)) = bfs_q.pop_front() {
            this_comp.push(linear(cur));
            for &(dz, dh, dw) in offsets.iter() {
                let neigh = (
                    z.wrapping_add_signed(dz),
                    h.wrapping_add_signed(dh),
                    w.wrapping_add_signed(dw),
                );
                // 越界时 `get` 返回 `None`, `wrapping` 产生的巨大下标也在此被滤掉.
                if mask.get(neigh).is_some_and(|p| is_foreground(*p)) && !visited[linear(neigh)] {
                    visited[linear(neigh)] = true;
                    bfs_q.push_back(neigh);
                }
            }
        }
        this_comp.sort_unstable();
        ans.push(this_comp);
    }
    ans
}

/// 对二维二值图像做连通分量标记. 等价于对单切片体积调用 [`components_3d`],
/// 因此线性索引为 `r * w + c`.
#[inline]
pub fn components_2d(mask: ArrayView2<u8>, conn: Connectivity) -> Vec<Vec<usize>> {
    components_3d(mask.insert_axis(Axis(0)), conn)
}

/// 选出体素数最多的分量的下标. 大小相同时取先出现者. 无分量时返回 `None`.
pub fn largest(components: &[Vec<usize>]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, comp) in components.iter().enumerate() {
        if best.map_or(true, |(_, len)| comp.len() > len) {
            best = Some((idx, comp.len()));
        }
    }
    best.map(|(idx, _)| idx)
}
