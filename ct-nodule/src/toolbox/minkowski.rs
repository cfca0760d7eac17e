//! 二值图像的离散几何测度 (周长, 表面积, 平均宽度, 欧拉数).
//!
//! 周长与表面积采用 Crofton 公式的离散估计: 沿若干方向的格点直线统计
//! 前景/背景交替次数. 所有测度都假定图像外部为背景 (零填充).

use crate::consts::gray::is_foreground;
use crate::data::Spacing;
use ndarray::{ArrayView2, ArrayView3, Axis};
use std::f64::consts::{PI, SQRT_2};

/// 零填充读取二维像素, 越界视为背景.
#[inline]
fn fg_2d(img: &ArrayView2<u8>, h: isize, w: isize) -> bool {
    if h < 0 || w < 0 {
        return false;
    }
    img.get((h as usize, w as usize))
        .is_some_and(|p| is_foreground(*p))
}

/// 零填充读取三维体素, 越界视为背景.
#[inline]
fn fg_3d(vol: &ArrayView3<u8>, z: isize, h: isize, w: isize) -> bool {
    if z < 0 || h < 0 || w < 0 {
        return false;
    }
    vol.get((z as usize, h as usize, w as usize))
        .is_some_and(|p| is_foreground(*p))
}

/// 统计二维图像沿方向 `(dh, dw)` 的前景/背景交替次数.
///
/// 每对相邻像素 `(p, p + d)` 中恰有一个为前景时计数一次.
fn transitions_2d(img: &ArrayView2<u8>, (dh, dw): (isize, isize)) -> usize {
    let mut cnt = 0usize;
    // 每个交替点对都至少包含一个前景像素; 从前景出发向前后两个方向检查即可覆盖全部点对.
    for ((h, w), _) in img.indexed_iter().filter(|(_, p)| is_foreground(**p)) {
        let (h, w) = (h as isize, w as isize);
        if !fg_2d(img, h + dh, w + dw) {
            cnt += 1;
        }
        if !fg_2d(img, h - dh, w - dw) {
            cnt += 1;
        }
    }
    cnt
}

/// 统计三维体积沿坐标轴 `axis` 的前景/背景交替次数.
fn transitions_3d(vol: &ArrayView3<u8>, axis: usize) -> usize {
    let mut d = [0isize; 3];
    d[axis] = 1;
    let mut cnt = 0usize;
    for ((z, h, w), _) in vol.indexed_iter().filter(|(_, p)| is_foreground(**p)) {
        let (z, h, w) = (z as isize, h as isize, w as isize);
        if !fg_3d(vol, z + d[0], h + d[1], w + d[2]) {
            cnt += 1;
        }
        if !fg_3d(vol, z - d[0], h - d[1], w - d[2]) {
            cnt += 1;
        }
    }
    cnt
}

/// 二维周长 (像素单位), 4 方向 Crofton 估计.
///
/// `P = π/8 · (n0 + n90 + (n45 + n135) / √2)`.
/// 空图像周长为 0.
pub fn perimeter_2d(img: ArrayView2<u8>) -> f64 {
    let n0 = transitions_2d(&img, (0, 1)) as f64;
    let n90 = transitions_2d(&img, (1, 0)) as f64;
    let n45 = transitions_2d(&img, (1, 1)) as f64;
    let n135 = transitions_2d(&img, (1, -1)) as f64;
    PI / 8.0 * (n0 + n90 + (n45 + n135) / SQRT_2)
}

/// 三维表面积 (mm²), 3 方向 Crofton 估计.
///
/// 体积按 (切片, 行, 列) 组织, 分别对应 `spacing.z`, `spacing.y`, `spacing.x`.
pub fn surface_area_3d(vol: ArrayView3<u8>, spacing: &Spacing) -> f64 {
    let nz = transitions_3d(&vol, 0) as f64;
    let nh = transitions_3d(&vol, 1) as f64;
    let nw = transitions_3d(&vol, 2) as f64;
    let (dx, dy, dz) = (spacing.x, spacing.y, spacing.z);
    2.0 / 3.0 * (nz * dx * dy + nh * dx * dz + nw * dy * dz)
}

/// 二维欧拉数, 前景 4-连通. 计算像素复形的 `V - E + F`.
pub fn euler_number_2d(img: ArrayView2<u8>) -> i64 {
    let (mut v, mut e, mut f) = (0i64, 0i64, 0i64);
    for ((h, w), _) in img.indexed_iter().filter(|(_, p)| is_foreground(**p)) {
        let (h, w) = (h as isize, w as isize);
        v += 1;
        let right = fg_2d(&img, h, w + 1);
        let down = fg_2d(&img, h + 1, w);
        e += right as i64 + down as i64;
        if right && down && fg_2d(&img, h + 1, w + 1) {
            f += 1;
        }
    }
    v - e + f
}

/// 三维欧拉数, 前景 6-连通. 计算体素复形的 `V - E + F - C`.
pub fn euler_number_3d(vol: ArrayView3<u8>) -> i64 {
    let (mut v, mut e, mut f, mut c) = (0i64, 0i64, 0i64, 0i64);
    for ((z, h, w), _) in vol.indexed_iter().filter(|(_, p)| is_foreground(**p)) {
        let (z, h, w) = (z as isize, h as isize, w as isize);
        let at = |dz, dh, dw| fg_3d(&vol, z + dz, h + dh, w + dw);
        v += 1;

        let (sz, sh, sw) = (at(1, 0, 0), at(0, 1, 0), at(0, 0, 1));
        e += sz as i64 + sh as i64 + sw as i64;

        let f_hw = sh && sw && at(0, 1, 1);
        let f_zw = sz && sw && at(1, 0, 1);
        let f_zh = sz && sh && at(1, 1, 0);
        f += f_hw as i64 + f_zw as i64 + f_zh as i64;

        if f_hw && f_zw && f_zh && at(1, 1, 1) {
            c += 1;
        }
    }
    v - e + f - c
}

/// 三维平均宽度 (mm), 3 方向 Crofton 估计.
///
/// 对每个坐标轴, 将垂直于该轴的所有平面截面的二维欧拉数求和, 乘以该轴体素间距;
/// 结果取三个方向的平均.
pub fn mean_breadth_3d(vol: ArrayView3<u8>, spacing: &Spacing) -> f64 {
    let along = |axis: usize| -> f64 {
        vol.axis_iter(Axis(axis))
            .map(|plane| euler_number_2d(plane) as f64)
            .sum()
    };
    (along(0) * spacing.z + along(1) * spacing.y + along(2) * spacing.x) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{s, Array2, Array3};

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn unit() -> Spacing {
        Spacing::isotropic(1.0).unwrap()
    }

    #[test]
    fn test_perimeter_single_pixel() {
        let mut img = Array2::<u8>::zeros((3, 3));
        img[(1, 1)] = 1;
        let expected = PI / 8.0 * (4.0 + 4.0 / SQRT_2);
        assert!(f64_eq(perimeter_2d(img.view()), expected));

        // 贴边的像素与居中的像素结果一致 (零填充).
        let mut corner = Array2::<u8>::zeros((3, 3));
        corner[(0, 0)] = 1;
        assert!(f64_eq(perimeter_2d(corner.view()), expected));
    }

    #[test]
    fn test_perimeter_empty() {
        let img = Array2::<u8>::zeros((4, 4));
        assert_eq!(perimeter_2d(img.view()), 0.0);
    }

    #[test]
    fn test_perimeter_square() {
        let mut img = Array2::<u8>::zeros((7, 7));
        img.slice_mut(s![2..5, 2..5]).fill(1);
        // 水平/竖直各 6 次, 两个对角方向各 10 次.
        let expected = PI / 8.0 * (12.0 + 20.0 / SQRT_2);
        assert!(f64_eq(perimeter_2d(img.view()), expected));
    }

    #[test]
    fn test_euler_2d() {
        let mut ring = Array2::<u8>::zeros((5, 5));
        ring.slice_mut(s![1..4, 1..4]).fill(1);
        assert_eq!(euler_number_2d(ring.view()), 1);
        ring[(2, 2)] = 0;
        assert_eq!(euler_number_2d(ring.view()), 0);

        let mut two = Array2::<u8>::zeros((5, 5));
        two[(0, 0)] = 1;
        two[(3, 3)] = 1;
        assert_eq!(euler_number_2d(two.view()), 2);
    }

    #[test]
    fn test_euler_3d() {
        let mut cube = Array3::<u8>::zeros((5, 5, 5));
        cube.slice_mut(s![1..4, 1..4, 1..4]).fill(1);
        assert_eq!(euler_number_3d(cube.view()), 1);

        // 挖空中心, 得到一个空腔: 欧拉数为 2.
        cube[(2, 2, 2)] = 0;
        assert_eq!(euler_number_3d(cube.view()), 2);
    }

    #[test]
    fn test_surface_and_breadth_of_voxel() {
        let mut vol = Array3::<u8>::zeros((3, 3, 3));
        vol[(1, 1, 1)] = 1;
        assert!(f64_eq(surface_area_3d(vol.view(), &unit()), 4.0));
        assert!(f64_eq(mean_breadth_3d(vol.view(), &unit()), 1.0));

        let sp = Spacing::new(0.5, 0.5, 2.0).unwrap();
        // 2/3 * (2 * 0.25 + 2 * 1.0 + 2 * 1.0)
        assert!(f64_eq(surface_area_3d(vol.view(), &sp), 2.0 / 3.0 * 4.5));
        assert!(f64_eq(mean_breadth_3d(vol.view(), &sp), 1.0));
    }

    #[test]
    fn test_surface_scales_quadratically() {
        let mut vol = Array3::<u8>::zeros((6, 6, 6));
        vol.slice_mut(s![1..4, 1..5, 2..4]).fill(1);
        let a = surface_area_3d(vol.view(), &unit());
        let b = surface_area_3d(vol.view(), &Spacing::isotropic(2.0).unwrap());
        assert!(f64_eq(b, 4.0 * a));
    }
}
