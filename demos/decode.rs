use pbtrace::{decode_message, fixture};

fn main() -> anyhow::Result<()> {
    let f = fixture::encode_fixture();
    let (fields, _remaining_bytes) = decode_message(&f);

    let s = serde_json::to_string_pretty(&fields)?;
    println!("{s}");
    Ok(())
}
