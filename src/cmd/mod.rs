pub mod classes;
pub mod depreciate;
pub mod invoice;
pub mod ledger;
pub mod schedule;
pub mod schema;
pub mod tax_return;
pub mod validate;

use anyhow::Context;
use clap::Args;
use corpbooks::core::{read_books_json, read_expenses_csv, Books};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Input options shared by every command that reads a company's books
#[derive(Args, Debug)]
pub struct BooksArgs {
    /// JSON file with the company's books (or "-" for stdin)
    #[arg(short, long)]
    pub books: PathBuf,

    /// CSV file of additional expenses to merge into the expense ledger
    #[arg(long)]
    pub expenses: Option<PathBuf>,
}

/// Books as read from disk, together with a fingerprint of the raw input
pub struct LoadedBooks {
    pub books: Books,
    pub digest: String,
}

impl BooksArgs {
    /// Read the books and merge any CSV expenses, without deriving anything
    pub fn read_raw(&self) -> anyhow::Result<LoadedBooks> {
        let bytes = read_input(&self.books)?;
        if bytes.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }

        let mut hasher = Sha256::new();
        hasher.update(&bytes);

        let mut books = read_books_json(io::Cursor::new(&bytes))
            .with_context(|| format!("reading books from {}", self.books.display()))?;

        if let Some(path) = &self.expenses {
            let csv_bytes = read_input(path)?;
            hasher.update(&csv_bytes);
            let extra = read_expenses_csv(csv_bytes.as_slice())
                .with_context(|| format!("reading expenses from {}", path.display()))?;
            log::info!("Merging {} expenses from {}", extra.len(), path.display());
            books.merge_expenses(extra);
        }

        Ok(LoadedBooks {
            books,
            digest: hex::encode(hasher.finalize()),
        })
    }

    /// Read the books and fill in derived fields
    pub fn load(&self) -> anyhow::Result<LoadedBooks> {
        let mut loaded = self.read_raw()?;
        loaded
            .books
            .normalize()
            .with_context(|| format!("invalid books in {}", self.books.display()))?;
        Ok(loaded)
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        BufReader::new(stdin.lock()).read_to_end(&mut buffer)?;
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        BufReader::new(file).read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}
