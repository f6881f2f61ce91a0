/// Convert one sRGB-encoded channel to linear light
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` in sRGB to linear rgb, ready for an sRGB render target
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xFF) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

/// Greyscale sRGB lightness to linear rgb
pub fn grey(lightness: f32) -> [f32; 3] {
    let l = srgb_to_linear(lightness);
    [l, l, l]
}
