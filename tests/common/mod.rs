#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// An uncompressed 24-bit BMP filled with one color.
pub fn bmp_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    let [r, g, b] = rgb;
    for _ in 0..height {
        let row_start = bytes.len();
        for _ in 0..width {
            bytes.extend_from_slice(&[b, g, r]);
        }
        bytes.resize(row_start + row_stride as usize, 0);
    }
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height, rgb)).expect("write bmp file");
}

/// A one-group banner with a headline and a call to action.
pub const BANNER_TREE: &str = r#"{
  "document": { "width": 1200, "height": 628, "resolution": 144 },
  "children": [
    { "type": "group", "name": "Hero", "top": 0, "left": 0, "bottom": 300, "right": 1200,
      "children": [
        { "type": "layer", "name": "Headline Copy", "top": 40, "left": 60, "bottom": 120, "right": 900,
          "text": { "value": "Save 20%", "font": { "names": ["Inter"], "sizes": [48],
                    "colors": [[255, 255, 255, 255]] } } },
        { "type": "layer", "name": "CTA Button", "top": 200, "left": 60, "bottom": 260, "right": 300,
          "text": { "value": "Shop now" }, "fill": { "color": [230, 30, 40] } }
      ] }
  ]
}"#;

pub fn write_tree(path: &Path, json: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, json).expect("write layer tree");
}

/// A flat 8-bit RGB Photoshop document with raw channel data.
///
/// `layers` are listed top of the layers panel first; each covers the whole
/// canvas with one opaque color.
pub fn psd_bytes(width: u32, height: u32, layers: &[(&str, [u8; 3])]) -> Vec<u8> {
    let pixels = (width * height) as usize;

    let mut records = Vec::new();
    let mut channel_data = Vec::new();
    // Photoshop stores the bottom layer first.
    for (name, [r, g, b]) in layers.iter().rev() {
        records.extend_from_slice(&0i32.to_be_bytes());
        records.extend_from_slice(&0i32.to_be_bytes());
        records.extend_from_slice(&(height as i32).to_be_bytes());
        records.extend_from_slice(&(width as i32).to_be_bytes());
        records.extend_from_slice(&4u16.to_be_bytes());
        for (id, fill) in [(-1i16, 255u8), (0, *r), (1, *g), (2, *b)] {
            records.extend_from_slice(&id.to_be_bytes());
            records.extend_from_slice(&(2 + pixels as u32).to_be_bytes());
            channel_data.extend_from_slice(&0u16.to_be_bytes());
            channel_data.extend(std::iter::repeat(fill).take(pixels));
        }
        records.extend_from_slice(b"8BIMnorm");
        records.extend_from_slice(&[255, 0, 0, 0]);

        let mut pascal_name = vec![name.len() as u8];
        pascal_name.extend_from_slice(name.as_bytes());
        pascal_name.resize(pascal_name.len().div_ceil(4) * 4, 0);
        records.extend_from_slice(&(8 + pascal_name.len() as u32).to_be_bytes());
        records.extend_from_slice(&0u32.to_be_bytes());
        records.extend_from_slice(&0u32.to_be_bytes());
        records.extend_from_slice(&pascal_name);
    }

    let mut layer_info = Vec::new();
    layer_info.extend_from_slice(&(layers.len() as i16).to_be_bytes());
    layer_info.extend_from_slice(&records);
    layer_info.extend_from_slice(&channel_data);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"8BPS");
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&[0; 6]);
    bytes.extend_from_slice(&3u16.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&8u16.to_be_bytes());
    bytes.extend_from_slice(&3u16.to_be_bytes());
    // color mode data, image resources
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    // layer and mask information: layer info plus an empty global mask
    bytes.extend_from_slice(&(4 + layer_info.len() as u32 + 4).to_be_bytes());
    bytes.extend_from_slice(&(layer_info.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&layer_info);
    bytes.extend_from_slice(&0u32.to_be_bytes());
    // composite image: raw, three zeroed channels
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend(std::iter::repeat(0u8).take(3 * pixels));
    bytes
}

/// A real Photoshop file with nested and empty groups interleaved with
/// loose layers.
pub fn nested_groups_psd() -> Vec<u8> {
    fs::read(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/nested-groups.psd"))
        .expect("read nested groups fixture")
}
