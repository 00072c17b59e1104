mod cli;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use fat12::{AttrFlag, Error, Geometry, ImageBuilder};
use typed_bytesize::ByteSizeIec;

pub use self::cli::Cli;

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    log::info!("loader={:?}\noutput={:?}", cli.loader, cli.output);

    let geometry = Geometry::FLOPPY_1440K;
    let layout = geometry.layout();
    log::info!("layout:\n{}", layout.equates());

    let loader = match fs::read(&cli.loader) {
        Ok(loader) => loader,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::error!("{:?} not found, assemble the boot loader first", cli.loader);
            return Err(io::Error::new(io::ErrorKind::NotFound, Error::MissingInput));
        }
        Err(e) => return Err(e),
    };
    log::info!("{:?}: {} bytes", cli.loader, loader.len());

    let mut builder = ImageBuilder::new(geometry).boot_loader(loader);
    for path in &cli.files {
        let name = file_name(path)?;
        let content = match fs::read(path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        builder = builder.optional_file(name, AttrFlag::Archive as u8, content);
    }

    let image = builder.build().map_err(io::Error::other)?;

    let mut fd = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&cli.output)?;
    fd.write_all(image.as_bytes())?;
    log::info!(
        "{:?} created, {} files added, {} skipped, {}",
        cli.output,
        image.entries().len(),
        image.skipped().len(),
        ByteSizeIec(image.as_bytes().len() as u64)
    );

    if let Some(equ) = &cli.equ {
        fs::write(equ, image.layout().equates().to_string())?;
        log::info!("layout constants written to {equ:?}");
    }

    Ok(())
}

/// 镜像中的文件名取宿主文件名的最后一段
fn file_name(path: &Path) -> io::Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{path:?} has no UTF-8 file name"),
            )
        })
}
