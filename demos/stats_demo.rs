use clap::Parser;
use chest::HashTable;
use chest::hash::fmix64;
use chest::hash::fnv1a;
use chest::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Percentage of the inserted keys to remove again before reporting.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 0)]
    remove_percent: u8,

    /// Hash keys with FNV-1a over their bytes instead of the scalar mixer.
    #[arg(long)]
    fnv: bool,
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashTable with target capacity: {}",
        args.target_capacity
    );

    let hash: fn(&u64) -> u64 = if args.fnv {
        |k| fnv1a(&k.to_le_bytes())
    } else {
        |k| fmix64(*k)
    };
    let mut table = HashTable::with_capacity(args.target_capacity, hash, |a: &u64, b: &u64| a == b);
    let initial_capacity = table.capacity();

    println!("Actual capacity: {}", initial_capacity);
    println!("Filling table with u64 keys...");

    let num_values = args.target_capacity as u64;
    for key in 0..num_values {
        match table.entry(key) {
            Ok(Entry::Vacant(entry)) => {
                entry.insert(key.wrapping_mul(31));
            }
            Ok(Entry::Occupied(_)) => panic!("Key already exists in table: {}", key),
            Err(err) => {
                eprintln!("Insertion of {} failed: {}", key, err);
                break;
            }
        }
    }

    let to_remove = num_values * u64::from(args.remove_percent.min(100)) / 100;
    let removed = (0..to_remove)
        .filter(|key| table.remove(key).is_some())
        .count();

    println!(
        "Inserted {} keys, removed {}, {} remain",
        num_values,
        removed,
        table.len()
    );
    if table.capacity() != initial_capacity {
        println!(
            "Table grew from {} to {} slots",
            initial_capacity,
            table.capacity()
        );
    }
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    table.probe_histogram().print();
    table.debug_stats().print();
}
