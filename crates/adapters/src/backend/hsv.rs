//! 8-bit RGB <-> HSV conversion. Hue is stored halved (`0..180`) so a full turn
//! fits in a byte; saturation and value use the full `0..=255` range.

pub const HUE_RANGE: u16 = 180;

pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let value = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = value - min;

    let saturation = if value > 0.0 {
        (255.0 * delta / value).round()
    } else {
        0.0
    };

    let mut degrees = if delta == 0.0 {
        0.0
    } else if value == rf {
        60.0 * (gf - bf) / delta
    } else if value == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if degrees < 0.0 {
        degrees += 360.0;
    }
    let hue = (degrees / 2.0).round() as u16 % HUE_RANGE;

    [hue as u8, saturation as u8, value as u8]
}

pub fn hsv_to_rgb([h, s, v]: [u8; 3]) -> [u8; 3] {
    let value = f32::from(v) / 255.0;
    let saturation = f32::from(s) / 255.0;
    let sector = (f32::from(h) * 2.0 % 360.0) / 60.0;
    let index = sector.floor();
    let fraction = sector - index;

    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * fraction);
    let t = value * (1.0 - saturation * (1.0 - fraction));

    let (r, g, b) = match index as u8 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };
    [to_byte(r), to_byte(g), to_byte(b)]
}

fn to_byte(unit: f32) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_map_to_expected_hues() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
    }

    #[test]
    fn grays_have_no_saturation() {
        for level in [0_u8, 17, 128, 255] {
            let hsv = rgb_to_hsv([level, level, level]);
            assert_eq!(hsv, [0, 0, level]);
            assert_eq!(hsv_to_rgb(hsv), [level, level, level]);
        }
    }

    #[test]
    fn primaries_and_secondaries_round_trip() {
        for rgb in [
            [255, 0, 0],
            [0, 255, 0],
            [0, 0, 255],
            [255, 255, 0],
            [0, 255, 255],
            [255, 0, 255],
        ] {
            assert_eq!(hsv_to_rgb(rgb_to_hsv(rgb)), rgb);
        }
    }

    #[test]
    fn half_turn_turns_red_into_cyan() {
        assert_eq!(hsv_to_rgb([90, 255, 255]), [0, 255, 255]);
    }
}
