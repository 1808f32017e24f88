use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use a64_addsub::frontend::a64::types::Reg;
use a64_addsub::{
    evaluate, translate, verification_pass, A64LocationDescriptor, A64State, Nzcv, ReservedValuePolicy,
    TranslationOptions,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Translate A64 add/subtract instructions and print the resulting IR"
)]
struct Opts {
    /// Address of the first instruction.
    #[arg(long, default_value = "0x0", value_parser = parse_hex)]
    pc: u64,
    /// Translate one instruction only.
    #[arg(long)]
    single_step: bool,
    /// JSON file with translation options.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Raise an exception on reserved encodings instead of interpreting them.
    #[arg(long)]
    raise_on_reserved: bool,
    /// Run the block on a zeroed register file and print the final state.
    #[arg(long)]
    eval: bool,
    /// Initial register value for --eval, e.g. `x2=0x10`, `sp=0x8000`, `nzcv=0x20000000`.
    #[arg(long = "set", value_name = "REG=VALUE")]
    set: Vec<String>,
    /// Instruction words in hex, in program order.
    #[arg(value_name = "WORD", required = true, value_parser = parse_word)]
    words: Vec<u32>,
}

fn parse_hex(s: &str) -> Result<u64, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X").replace('_', "");
    u64::from_str_radix(&digits, 16).map_err(|e| format!("invalid hex value `{s}`: {e}"))
}

fn parse_word(s: &str) -> Result<u32, String> {
    let value = parse_hex(s)?;
    u32::try_from(value).map_err(|_| format!("`{s}` does not fit in 32 bits"))
}

fn load_options(opts: &Opts) -> Result<TranslationOptions> {
    let mut options = match &opts.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => TranslationOptions::default(),
    };
    if opts.raise_on_reserved {
        options.reserved_value = ReservedValuePolicy::RaiseException;
    }
    Ok(options)
}

fn apply_assignment(state: &mut A64State, assignment: &str) -> Result<()> {
    let Some((name, value)) = assignment.split_once('=') else {
        bail!("expected REG=VALUE, got `{assignment}`");
    };
    let value = parse_hex(value).map_err(anyhow::Error::msg)?;
    match name.to_ascii_lowercase().as_str() {
        "sp" => state.sp = value,
        "nzcv" => state.nzcv = Nzcv::from_bits_truncate(value as u32),
        reg => {
            let (wide, number) = if let Some(n) = reg.strip_prefix('x') {
                (true, n)
            } else if let Some(n) = reg.strip_prefix('w') {
                (false, n)
            } else {
                bail!("unknown register `{name}`");
            };
            let index: u32 = number
                .parse()
                .ok()
                .filter(|n| *n < 31)
                .with_context(|| format!("unknown register `{name}`"))?;
            let value = if wide {
                value
            } else {
                // Writing Wn zeroes the upper half of Xn.
                u32::try_from(value).with_context(|| format!("{value:#x} does not fit in `{name}`"))? as u64
            };
            state.set_x(Reg::from_u32(index), value);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let options = load_options(&opts)?;

    let base = opts.pc;
    let words = opts.words.clone();
    let fetch = move |pc: u64| -> Option<u32> {
        let offset = pc.checked_sub(base)? / 4;
        words.get(usize::try_from(offset).ok()?).copied()
    };

    let descriptor = A64LocationDescriptor::new(opts.pc, opts.single_step);
    let block = translate(descriptor, &fetch, options);
    verification_pass(&block).context("translated block failed verification")?;
    info!(
        location = %descriptor,
        instructions = block.inst_count(),
        cycles = block.cycle_count,
        "translated"
    );

    print!("{block}");

    if opts.eval {
        let mut state = A64State { pc: opts.pc, ..A64State::default() };
        for assignment in &opts.set {
            apply_assignment(&mut state, assignment)?;
        }
        evaluate(&block, &mut state)?;
        println!("{}", serde_json::to_string_pretty(&state)?);
    }

    Ok(())
}
