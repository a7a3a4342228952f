use bitexplore_bitstream::bitswap::BitWidth;
use bitexplore_bitstream::sync::SyncStatus;
use bitexplore_bitstream::{Container, DecodeError, DecodeOptions, Session};
use clap::{Arg, ArgAction, Command, value_parser};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let m = Command::new("bitexplore")
        .about("Disassembles 7-series configuration bitstreams and dumps their frames")
        .arg(
            Arg::new("file")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("type")
                .short('t')
                .long("type")
                .help("container type, guessed from the extension if not given")
                .value_parser(["bit", "bin", "clr"]),
        )
        .arg(
            Arg::new("disassemble")
                .short('d')
                .long("disassemble")
                .help("walk every packet instead of dumping frames")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("do not print the packets preceding the frame data")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip-frames")
                .short('s')
                .long("skip-frames")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("max-frames")
                .short('n')
                .long("max-frames")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("bitflip")
                .short('b')
                .long("bitflip")
                .help("reverse the bits of each frame word in groups of 0, 8, 16 or 32")
                .value_parser(value_parser!(u32))
                .default_value("0"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("fail on unknown command words")
                .action(ArgAction::SetTrue),
        )
        .get_matches();
    let arg_file = m.get_one::<PathBuf>("file").unwrap();
    let arg_type = m.get_one::<String>("type");
    let arg_skip = m.get_one::<usize>("skip-frames").copied();
    let arg_max = m.get_one::<usize>("max-frames").copied();
    let arg_bitflip = *m.get_one::<u32>("bitflip").unwrap();
    let flag_disassemble = m.get_flag("disassemble");
    let flag_quiet = m.get_flag("quiet");
    let flag_strict = m.get_flag("strict");

    let ext = match arg_type {
        Some(t) => t.as_str(),
        None => arg_file
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default(),
    };
    let Some(container) = Container::from_extension(ext) else {
        return Err(format!("unrecognized extension {ext:?}, use --type").into());
    };
    let Some(width) = BitWidth::from_bits(arg_bitflip) else {
        return Err(format!("unsupported bitflip width {arg_bitflip}").into());
    };
    let mut options = DecodeOptions::new();
    if flag_strict {
        options = options.strict();
    }
    if !flag_quiet {
        options = options.trace();
    }

    let data = std::fs::read(arg_file)?;
    let mut session = Session::open(&data, container, options)?;
    let mut out = std::io::stdout().lock();
    if flag_disassemble {
        let dis = session.disassemble();
        dis.dump(&mut out)?;
        return match dis.error() {
            Some(e) => Err(e.clone().into()),
            None => Ok(()),
        };
    }
    if let SyncStatus::Found(pos) = session.sync_status() {
        writeln!(out, "position: {pos}")?;
    }

    let (packets, region) = session.locate()?;
    for packet in &packets {
        write!(out, "{packet}")?;
    }
    writeln!(out, "Type2")?;
    writeln!(out, "{region}")?;

    let mut dumper = session.frames(region);
    if let Some(n) = arg_skip {
        dumper.skip_frames(n)?;
        writeln!(out, "new position: {}", dumper.pos())?;
    }
    for frame in dumper.take(arg_max.unwrap_or(usize::MAX)) {
        match frame {
            Ok(frame) => writeln!(out, "{}", frame.line(width))?,
            // already logged by the dumper
            Err(DecodeError::AnomalousFrameRemainder { .. }) => (),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
