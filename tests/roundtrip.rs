use tabular_data::ingestion::AttachOptions;
use tabular_data::{BorrowedDataset, OwnedDataset, TypeTag};

/// Small deterministic generator so the generated tables are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

const WORDS: &[&str] = &["alpha", "beta gamma", "say \\\"hi\\\"", "a,b", "back\\\\slash", "x"];

fn generate_csv(seed: u64, rows: usize) -> String {
    let mut rng = Lcg(seed);
    let mut out = String::from("\"int\",\"float\",\"text\",\"sparse\"\n");
    for _ in 0..rows {
        let int = rng.below(2_000_000) as i64 - 1_000_000;
        let float = format!("{}.{}", rng.below(1000) as i64 - 500, rng.below(100));
        let text = WORDS[rng.below(WORDS.len() as u64) as usize];
        let sparse = if rng.below(3) == 0 {
            String::new()
        } else {
            rng.below(50).to_string()
        };
        out.push_str(&format!("{int},{float},\"{text}\",{sparse}\n"));
    }
    out
}

#[test]
fn serialized_dataset_reattaches_to_an_equal_dataset() {
    for seed in [1_u64, 7, 42, 1234] {
        let input = generate_csv(seed, 200);
        let ds = BorrowedDataset::attach(&input, &AttachOptions::default()).unwrap();
        assert_eq!(ds.rows(), 200);
        assert_eq!(ds.column_type(0), Some(TypeTag::Integer));
        assert_eq!(ds.column_type(1), Some(TypeTag::Float));
        assert_eq!(ds.column_type(2), Some(TypeTag::String));

        let text = ds.to_csv_string().unwrap();
        let again = BorrowedDataset::attach(&text, &AttachOptions::default()).unwrap();
        assert_eq!(again, ds, "seed {seed}");

        // Writing is stable once the text is canonical.
        assert_eq!(again.to_csv_string().unwrap(), text);
    }
}

#[test]
fn owned_and_borrowed_datasets_agree() {
    let input = generate_csv(99, 50);
    let borrowed = BorrowedDataset::attach(&input, &AttachOptions::default()).unwrap();
    let owned = OwnedDataset::attach(&input, &AttachOptions::default()).unwrap();

    assert_eq!(borrowed.clone().into_owned(), owned);
    assert_eq!(borrowed.to_string(), owned.to_string());
    assert_eq!(owned.to_string().lines().count(), 51);
}

#[test]
fn write_csv_to_a_file_and_back() {
    let input = generate_csv(5, 20);
    let ds = OwnedDataset::attach(&input, &AttachOptions::default()).unwrap();

    let path = std::env::temp_dir().join(format!("tabular_data_roundtrip_{}.csv", std::process::id()));
    let file = std::fs::File::create(&path).unwrap();
    ds.write_csv(file).unwrap();

    let back = tabular_data::ingestion::ingest_from_path(&path, &AttachOptions::default()).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(back, ds);
}
