use {
    alloy::{
        providers::{Provider, ProviderBuilder},
        transports::http::reqwest::Url,
    },
    anyhow::Context,
    clap::Parser,
    regenesis_dump::{Account, GenesisState, load_dump},
    regenesis_solc::{CompilerCache, EtherscanDataset, SolcDirectory},
    regenesis_surgery::{
        Args, PoolAddresses, ReferenceSets, RpcCodeSource, SurgeryDataSources,
        ThrottledCodeSource, compile_limiter, perform_surgery,
    },
    std::{
        fs::File,
        io::{BufWriter, Write},
        path::Path,
        sync::Arc,
    },
    tracing::info,
    tracing_subscriber::EnvFilter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let sources = load_sources(&args)?;
    let accounts = perform_surgery(&sources, args.account_concurrency).await?;
    write_output(&args.output, &accounts)?;
    info!(accounts = accounts.len(), path = %args.output.display(), "Wrote new genesis state");

    Ok(())
}

fn load_sources(
    args: &Args,
) -> anyhow::Result<SurgeryDataSources<ThrottledCodeSource<RpcCodeSource<impl Provider>>>> {
    let dump = load_dump(&args.state_dump).context("Failed to load state dump")?;
    let genesis = GenesisState::load(&args.genesis).context("Failed to load genesis")?;
    let etherscan =
        EtherscanDataset::load(&args.etherscan).context("Failed to load verified sources")?;
    let references =
        ReferenceSets::load(&args.references).context("Failed to load reference sets")?;
    let pools = PoolAddresses::load(&args.pools).context("Failed to load pool addresses")?;

    Ok(SurgeryDataSources {
        dump,
        genesis,
        pools,
        etherscan,
        references,
        legacy_l2: code_source("legacy l2", &args.legacy_l2_rpc, args),
        legacy_mainnet: code_source("legacy mainnet", &args.legacy_mainnet_rpc, args),
        new_chain: code_source("new chain", &args.new_chain_rpc, args),
        compilers: Arc::new(CompilerCache::new(SolcDirectory::new(&args.compilers_dir))),
        compile_limiter: compile_limiter(),
    })
}

fn code_source(
    name: &str,
    url: &Url,
    args: &Args,
) -> ThrottledCodeSource<RpcCodeSource<impl Provider + use<>>> {
    let provider = ProviderBuilder::new().on_http(url.clone());

    ThrottledCodeSource::new(
        RpcCodeSource::new(name, provider),
        args.rpc_concurrency,
        args.retry_policy(),
    )
}

fn write_output(path: &Path, accounts: &[Account]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, accounts).context("Failed to write output")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
