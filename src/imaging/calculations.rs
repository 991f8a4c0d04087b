//! 焦点裁剪的纯几何计算，不涉及任何像素操作。
//! 所有函数无共享状态，可在多线程中并发调用。

use super::ImagingError;

/// 源图坐标系中的裁剪矩形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 计算保持焦点的 cover 裁剪矩形。
///
/// 矩形与目标同宽高比，是源图内能容纳的最大矩形（cover 而非 contain，
/// 输出铺满目标尺寸，不留黑边）。矩形的摆放让焦点在矩形内的相对位置
/// 与它在整幅源图中的相对位置一致，再夹紧到源图边界内。
/// 焦点分量超出 [0, 1] 时先行夹紧，不报错。
///
/// 例：源 800×600，目标 400×400，焦点 (0.5, 0.5)
/// → 矩形 {x: 100, y: 0, w: 600, h: 600}。
pub fn focused_crop_rect(
    source: (u32, u32),
    target: (u32, u32),
    focus: (f64, f64),
) -> Result<CropRect, ImagingError> {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;
    if src_w == 0 || src_h == 0 || tgt_w == 0 || tgt_h == 0 {
        return Err(ImagingError::InvalidDimensions {
            source_size: source,
            target_size: target,
        });
    }

    let fx = focus.0.clamp(0.0, 1.0);
    let fy = focus.1.clamp(0.0, 1.0);

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    // 受限维度决定矩形大小：源图更宽时高度打满，更高时宽度打满
    let (sub_w, sub_h) = if src_aspect > tgt_aspect {
        ((src_h as f64 * tgt_aspect).round() as u32, src_h)
    } else {
        (src_w, (src_w as f64 / tgt_aspect).round() as u32)
    };
    // 极端宽高比下四舍五入可能塌缩为零，受限维度至少保留 1 像素
    let sub_w = sub_w.max(1).min(src_w);
    let sub_h = sub_h.max(1).min(src_h);

    // 矩形原点 = 焦点绝对坐标 − 焦点比例 × 矩形尺寸，逐轴夹紧到源图内
    let focal_x = fx * src_w as f64;
    let focal_y = fy * src_h as f64;
    let x = (focal_x - fx * sub_w as f64)
        .clamp(0.0, (src_w - sub_w) as f64)
        .round() as u32;
    let y = (focal_y - fy * sub_h as f64)
        .clamp(0.0, (src_h - sub_h) as f64)
        .round() as u32;

    Ok(CropRect {
        x,
        y,
        width: sub_w,
        height: sub_h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_focus_landscape_source() {
        // 宽度受限：800×600 -> 400×400，居中焦点
        let rect = focused_crop_rect((800, 600), (400, 400), (0.5, 0.5)).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 100,
                y: 0,
                width: 600,
                height: 600
            }
        );
    }

    #[test]
    fn test_centered_focus_equals_centered_cover() {
        // 居中焦点就是普通的居中 cover 裁剪
        let rect = focused_crop_rect((600, 800), (300, 300), (0.5, 0.5)).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 0,
                y: 100,
                width: 600,
                height: 600
            }
        );
    }

    #[test]
    fn test_focus_top_left_pins_origin() {
        let rect = focused_crop_rect((800, 600), (400, 400), (0.0, 0.0)).unwrap();
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0);
    }

    #[test]
    fn test_focus_bottom_right_pins_far_corner() {
        let rect = focused_crop_rect((800, 600), (400, 400), (1.0, 1.0)).unwrap();
        assert_eq!(rect.x + rect.width, 800);
        assert_eq!(rect.y + rect.height, 600);
    }

    #[test]
    fn test_out_of_range_focus_is_clamped() {
        let clamped = focused_crop_rect((800, 600), (400, 400), (-0.5, 2.0)).unwrap();
        let reference = focused_crop_rect((800, 600), (400, 400), (0.0, 1.0)).unwrap();
        assert_eq!(clamped, reference);
    }

    #[test]
    fn test_extreme_aspect_mismatch_keeps_nonzero_rect() {
        // 受限维度四舍五入到零的退化组合
        let rect = focused_crop_rect((1000, 1), (1, 1000), (0.5, 0.5)).unwrap();
        assert_eq!((rect.width, rect.height), (1, 1));
        assert!(rect.x + rect.width <= 1000);

        let rect = focused_crop_rect((1, 1000), (1000, 1), (0.5, 0.5)).unwrap();
        assert_eq!((rect.width, rect.height), (1, 1));
        assert!(rect.y + rect.height <= 1000);
    }

    #[test]
    fn test_rect_always_inside_source() {
        let sizes = [(800, 600), (600, 800), (1000, 1000), (123, 457), (1000, 1), (1, 1000)];
        let targets = [(400, 400), (100, 300), (457, 123), (1, 1000), (1000, 1)];
        let focuses = [(0.0, 0.0), (0.3, 0.9), (0.5, 0.5), (1.0, 1.0)];
        for source in sizes {
            for target in targets {
                for focus in focuses {
                    let rect = focused_crop_rect(source, target, focus).unwrap();
                    assert!(rect.width > 0 && rect.height > 0);
                    assert!(
                        rect.x + rect.width <= source.0,
                        "源 {source:?} 目标 {target:?} 焦点 {focus:?} 越界: {rect:?}"
                    );
                    assert!(rect.y + rect.height <= source.1);
                }
            }
        }
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        for (source, target) in [
            ((0, 600), (400, 400)),
            ((800, 0), (400, 400)),
            ((800, 600), (0, 400)),
            ((800, 600), (400, 0)),
        ] {
            let err = focused_crop_rect(source, target, (0.5, 0.5)).unwrap_err();
            assert!(matches!(err, ImagingError::InvalidDimensions { .. }));
        }
    }

    #[test]
    fn test_matching_aspect_uses_whole_source() {
        let rect = focused_crop_rect((800, 600), (400, 300), (0.7, 0.2)).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 0,
                y: 0,
                width: 800,
                height: 600
            }
        );
    }
}
