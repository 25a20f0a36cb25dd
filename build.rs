use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Build script: reads the punctuation normalization data (variant -> canonical glyph)
    // and generates `$OUT_DIR/puncnorm_table.rs`, a phf map consulted by `puncnorm`.

    let crate_root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let data = crate_root.join("data").join("puncnorm.json");
    println!("cargo:rerun-if-changed={}", data.display());

    let json_text = fs::read_to_string(&data).expect("failed to read data/puncnorm.json");
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set by cargo");
    write_table(Path::new(&out_dir), &json_text);
}

fn write_table(out_dir: &Path, json_text: &str) {
    let v: serde_json::Value = match serde_json::from_str(json_text) {
        Ok(v) => v,
        Err(e) => panic!("invalid json in data/puncnorm.json: {}", e),
    };
    let obj = v.as_object().expect("data/puncnorm.json must be a JSON object");

    let mut entries = String::new();
    for (k, val) in obj {
        let variant = single_char(k);
        let canonical = single_char(val.as_str().expect("expected string value in puncnorm json"));
        if variant == canonical {
            continue; // identity rows carry no information
        }
        // Debug formatting yields a valid Rust char literal.
        entries.push_str(&format!("    {:?} => {:?},\n", variant, canonical));
    }

    let content = format!(
        r#"// Auto-generated from data/puncnorm.json. Do not edit manually.
use phf::phf_map;

pub static PUNCNORM: phf::Map<char, char> = phf_map!{{
{}
}};
"#,
        entries
    );

    fs::write(out_dir.join("puncnorm_table.rs"), content)
        .expect("failed to write puncnorm_table.rs");
}

fn single_char(s: &str) -> char {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => panic!("puncnorm entries must be single characters, got {:?}", s),
    }
}
