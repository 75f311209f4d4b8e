use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// BT.601 luminance weights in Q8 (sum to 256).
const LUMA_Q8: [u16; 3] = [77, 150, 29];

/// Sepia matrix in Q8, one row per output channel.
const SEPIA_Q8: [[u16; 3]; 3] = [[101, 197, 48], [89, 176, 43], [70, 137, 34]];

/// Warm-tone desaturation: share of the original channel, the rest is luma.
const WARM_KEEP_Q8: u16 = 179;

/// Write a 256-entry table of unshifted Q8 products `i * coeff`.
///
/// The products are kept unshifted so kernels can sum several table reads
/// and shift once, which matches the multiply-then-shift kernels exactly.
fn write_product_table(file: &mut File, name: &str, coeff: u16, doc: &str) {
    writeln!(file, "/// {doc}").unwrap();
    writeln!(file, "pub static {name}: [u16; 256] = [").unwrap();
    for i in 0..256u32 {
        if i > 0 && i % 16 == 0 {
            writeln!(file).unwrap();
        }
        write!(file, " {},", i * coeff as u32).unwrap();
    }
    writeln!(file, "\n];").unwrap();
    writeln!(file).unwrap();
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("filter_lut.rs");
    let mut file = File::create(&dest_path).unwrap();

    let channels = ["R", "G", "B"];

    for (channel, &coeff) in channels.iter().zip(LUMA_Q8.iter()) {
        write_product_table(
            &mut file,
            &format!("LUMA_{channel}"),
            coeff,
            &format!("Luma contribution of the {channel} channel, Q8 (i * {coeff})"),
        );
    }

    for (out, row) in channels.iter().zip(SEPIA_Q8.iter()) {
        for (input, &coeff) in channels.iter().zip(row.iter()) {
            write_product_table(
                &mut file,
                &format!("SEPIA_{out}{input}"),
                coeff,
                &format!("Sepia {input} -> {out} contribution, Q8 (i * {coeff})"),
            );
        }
    }

    write_product_table(
        &mut file,
        "WARM_KEEP",
        WARM_KEEP_Q8,
        &format!("Warm-tone retained channel, Q8 (i * {WARM_KEEP_Q8})"),
    );
    write_product_table(
        &mut file,
        "WARM_MIX",
        256 - WARM_KEEP_Q8,
        &format!("Warm-tone luma mix-in, Q8 (i * {})", 256 - WARM_KEEP_Q8),
    );

    println!("cargo::rerun-if-changed=build.rs");
}
