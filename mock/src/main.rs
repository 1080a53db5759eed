#![doc(hidden)]

//! A proof-of-concept for the basic use case, mocking the client/server parts.
//!
//! The client backs up some files on a server it doesn't trust, only keeping the root hash of their hash tree.
//! Any restored file then comes with a hash proof that the client checks against this root hash.

use hashtree::{Sha256Proof, Sha256Tree};
use sha2::{digest::Output, Digest, Sha256};
use thiserror::Error;


const DATA: [&str; 3] = [
    "a backup of my notes",
    "holiday pictures index",
    "the quarterly report draft",
];

type File = String;
type Checksum = Output<Sha256>;

#[derive(Debug, Error)]
enum MockError {
    #[error("upload failed, checksum mismatch for file #{0}")]
    Checksum(usize),

    #[error("file #{0} not found")]
    NotFound(usize),

    #[error("file #{0} is corrupted")]
    Corrupted(usize),

    #[error(transparent)]
    Tree(#[from] hashtree::Error),
}

#[derive(Default)]
struct Server {
    merkle_tree: Option<Sha256Tree>,
    uploaded_files: Vec<File>,
}

impl Server {
    /// Upload a batch of files, replacing any previous backup once every checksum got checked.
    async fn upload_files(&mut self, files: Vec<(File, Checksum)>) -> Result<(), MockError> {
        if let Some(index) = files.iter().position(|(content, checksum)| *checksum != Sha256::digest(content)) {
            return Err(MockError::Checksum(index));
        }

        let (contents, checksums): (Vec<_>, Vec<_>) = files.into_iter().unzip();

        // the whole batch gets committed at once
        self.merkle_tree = Some(Sha256Tree::build(checksums.iter().copied())?);
        self.uploaded_files = contents;

        for (index, checksum) in checksums.iter().enumerate() {
            log::info!("file #{index} successfully uploaded (checksum: {checksum:x})");
        }

        Ok(())
    }

    async fn download_file(&self, index: usize) -> Result<(File, Sha256Proof), MockError> {
        match (self.uploaded_files.get(index), &self.merkle_tree) {
            (Some(file), Some(tree)) => Ok((file.clone(), tree.proof_at(index)?)),
            _ => Err(MockError::NotFound(index)),
        }
    }

    fn alter_file(&mut self, index: usize) {
        if let Some(file) = self.uploaded_files.get_mut(index) {
            *file = file
                .chars()
                .map(|c| match c {
                    _ if c.is_ascii_lowercase() => c.to_ascii_uppercase(),
                    _ if c.is_ascii_uppercase() => c.to_ascii_lowercase(),
                    _ => c,
                })
                .collect();

            log::warn!("oh noes, file #{index} got corrupted on server side!!!");
        }
    }
}

#[derive(Default)]
struct Client {
    root_hash: Checksum,
}

impl Client {
    async fn store_root_hash(&mut self, root_hash: Checksum) {
        self.root_hash = root_hash;
    }

    async fn backup_files(&self, server: &mut Server, files: impl IntoIterator<Item = File>) -> Result<Checksum, MockError> {
        let files = files
            .into_iter()
            .map(|file| {
                let checksum = Sha256::digest(&file);
                (file, checksum)
            })
            .collect::<Vec<_>>();

        let merkle_tree = Sha256Tree::build(files.iter().map(|(_, checksum)| *checksum))?;
        server.upload_files(files).await?;

        Ok(*merkle_tree.hash())
    }

    async fn restore_file(&self, server: &Server, index: usize) -> Result<File, MockError> {
        let (file, proof) = server.download_file(index).await?;

        self.check_file(index, &file, &proof)?;

        Ok(file)
    }

    fn check_file(&self, index: usize, file: &File, proof: &Sha256Proof) -> Result<(), MockError> {
        match proof.verify(&self.root_hash, Sha256::digest(file)) {
            true => Ok(()),
            false => Err(MockError::Corrupted(index)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), MockError> {
    const CORRUPTED_INDEX: usize = 2;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut server = Server::default();
    let mut client = Client::default();

    println!("Uploading files for backup...");
    let root_hash = client.backup_files(&mut server, DATA.map(Into::into)).await?;

    println!("Storing local information... (root hash: {root_hash:x})");
    client.store_root_hash(root_hash).await;

    server.alter_file(CORRUPTED_INDEX);

    for index in 0..DATA.len() + 1 {
        print!("Restoring file #{index}...");
        let res = client.restore_file(&server, index).await;
        println!(" {res:?}");
    }

    Ok(())
}
