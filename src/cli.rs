use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::{Confirm, Input};

use crate::config::{self, LyricsSettings};
use crate::core::exporter::ExportOutcome;
use crate::core::fetcher::{FetchOutcome, Skip};
use crate::core::importer::ImportOutcome;
use crate::core::{scanner, tagger, template};
use crate::models::Track;
use crate::plugin::LyricsPlugin;
use crate::sources::lrclib::LrclibClient;

#[derive(Parser)]
#[command(name = "lrctag", about = "lrclib.net 연동 MP3 가사 태그 / lrc 파일 도구")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 디버그 로그 출력
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 가사 태그와 lrc 파일 현황 표시
    Scan {
        /// MP3 파일 또는 디렉토리
        path: PathBuf,
    },
    /// lrclib.net에서 가사를 가져와 태그에 기록하고 lrc 파일로 내보내기
    Fetch {
        /// MP3 파일 또는 디렉토리
        path: PathBuf,
        /// 태그 기록과 lrc 내보내기 없이 결과만 표시
        #[arg(long)]
        dry_run: bool,
    },
    /// 태그에 있는 가사를 lrc 파일로 내보내기
    Export {
        /// MP3 파일 또는 디렉토리
        path: PathBuf,
    },
    /// lrc 파일의 가사를 태그로 가져오기
    Import {
        /// MP3 파일 또는 디렉토리
        path: PathBuf,
    },
    /// 가사 옵션 설정
    Config,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan { path } => cmd_scan(&path),
        Commands::Fetch { path, dry_run } => cmd_fetch(&path, dry_run),
        Commands::Export { path } => cmd_export(&path),
        Commands::Import { path } => cmd_import(&path),
        Commands::Config => cmd_config(),
    }
}

fn new_plugin() -> Result<LyricsPlugin<LrclibClient>> {
    let cfg = config::load_config();
    Ok(LyricsPlugin::new(cfg.lyrics, LrclibClient::new()?))
}

fn cmd_scan(path: &Path) -> Result<()> {
    let settings = config::load_config().lyrics;
    let files = scanner::scan_path(path)?;

    if files.is_empty() {
        println!("{}에서 MP3 파일을 찾을 수 없습니다", path.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["파일", "제목", "아티스트", "가사", "lrc 파일"]);

    let mut with_lyrics = 0;
    let mut with_lrc = 0;
    for file in &files {
        let lrc_path =
            template::resolve_lrc_path(&settings.exported_lrc_filename, &file.path, &file.metadata);
        let has_lyrics = file.metadata.has("lyrics");
        let has_lrc = lrc_path.exists();
        with_lyrics += usize::from(has_lyrics);
        with_lrc += usize::from(has_lrc);

        let lrc_name = lrc_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(file.filename()),
            Cell::new(if file.metadata.is_empty() {
                "-"
            } else {
                file.metadata.display_title()
            }),
            Cell::new(file.metadata.display_artist()),
            Cell::new(if has_lyrics { "있음" } else { "없음" }),
            Cell::new(if has_lrc {
                lrc_name
            } else {
                format!("{} (없음)", lrc_name)
            }),
        ]);
    }

    println!("{table}");
    println!(
        "\n총 {} 파일 (가사 태그: {}, lrc 파일: {})",
        files.len(),
        with_lyrics,
        with_lrc,
    );

    Ok(())
}

fn cmd_fetch(path: &Path, dry_run: bool) -> Result<()> {
    let mut plugin = new_plugin()?;
    let files = scanner::scan_path(path)?;

    if files.is_empty() {
        println!("{}에서 MP3 파일을 찾을 수 없습니다", path.display());
        return Ok(());
    }

    let mut fetched = 0;
    for mut file in files {
        println!("--- {} ---", file.filename());

        let before = file.metadata.lyrics().map(str::to_string);
        let outcome = plugin.on_file_added(&mut file);
        println!("  {}", describe_fetch(outcome));
        if matches!(outcome, FetchOutcome::Fetched { .. }) {
            fetched += 1;
        }

        if dry_run {
            let cached = plugin.cached_lyrics(file.metadata.title().unwrap_or_default());
            if let Some(lyrics) = cached {
                println!("  받은 가사: {}줄", lyrics.lines().count());
            }
            continue;
        }

        if file.metadata.lyrics() != before.as_deref() {
            if let Err(e) = tagger::write_tags(&file.path, &file.metadata) {
                println!("  태그 저장 실패: {:#}", e);
                continue;
            }
            println!("  가사 태그를 저장했습니다.");
        }

        if let Some(msg) = describe_export(&plugin.on_file_saved(&file)) {
            println!("  {}", msg);
        }
    }

    println!("\n완료! 가사를 찾은 파일: {}", fetched);
    if dry_run {
        println!("(dry-run) 내보내지 않은 가사: {}", plugin.pending_exports());
    }
    Ok(())
}

fn cmd_export(path: &Path) -> Result<()> {
    let mut plugin = new_plugin()?;
    if !plugin.settings().exported_lrc {
        println!("lrc 내보내기가 꺼져 있습니다. 'lrctag config'에서 켜세요.");
        return Ok(());
    }

    let files = scanner::scan_path(path)?;
    let mut written = 0;
    for file in &files {
        let outcome = plugin.on_file_saved(file);
        if matches!(outcome, ExportOutcome::Written(_)) {
            written += 1;
        }
        if let Some(msg) = describe_export(&outcome) {
            println!("{}: {}", file.filename(), msg);
        }
    }

    println!("\n완료! {}개 파일 중 {}개를 내보냈습니다.", files.len(), written);
    Ok(())
}

fn cmd_import(path: &Path) -> Result<()> {
    let plugin = new_plugin()?;
    let mut tracks: Vec<Track> = scanner::scan_path(path)?
        .into_iter()
        .map(Track::from_file)
        .collect();

    let outcomes = plugin.import_lrc(&mut tracks);

    let mut imported = 0;
    for (track, outcome) in tracks.iter().zip(&outcomes) {
        let Some(file) = track.files.first() else {
            continue;
        };
        let msg = match outcome {
            ImportOutcome::Imported(lrc) => {
                if let Err(e) = tagger::write_tags(&file.path, &file.metadata) {
                    println!("{}: 태그 저장 실패: {:#}", file.filename(), e);
                    continue;
                }
                imported += 1;
                format!("{}에서 가사를 가져왔습니다", lrc.display())
            }
            ImportOutcome::Synced(lrc) => {
                format!("{}은(는) 싱크 가사라 건너뜁니다", lrc.display())
            }
            ImportOutcome::NotFound(lrc) => format!("lrc 파일 없음: {}", lrc.display()),
            ImportOutcome::Failed(lrc) => format!("lrc 파일을 읽을 수 없습니다: {}", lrc.display()),
            ImportOutcome::NoFile => continue,
        };
        println!("{}: {}", file.filename(), msg);
    }

    println!("\n완료! 가사를 가져온 파일: {}", imported);
    Ok(())
}

fn describe_fetch(outcome: FetchOutcome) -> &'static str {
    match outcome {
        FetchOutcome::Skipped(Skip::Disabled) => "가사 기록 옵션이 모두 꺼져 있습니다.",
        FetchOutcome::Skipped(Skip::MissingTags) => "제목과 아티스트가 필요합니다. 건너뜁니다.",
        FetchOutcome::Skipped(Skip::AlreadyHasLyrics) => "이미 가사가 있습니다. 건너뜁니다.",
        FetchOutcome::LookupFailed => "가사 검색에 실패했습니다.",
        FetchOutcome::NotFound => "가사를 찾을 수 없습니다.",
        FetchOutcome::Fetched { embedded: true } => "가사를 가져왔습니다.",
        FetchOutcome::Fetched { embedded: false } => "가사를 가져왔습니다 (태그에는 기록하지 않음).",
    }
}

fn describe_export(outcome: &ExportOutcome) -> Option<String> {
    match outcome {
        ExportOutcome::Disabled => None,
        ExportOutcome::NoLyrics => Some("내보낼 가사가 없습니다.".to_string()),
        ExportOutcome::Exists(p) => Some(format!("lrc 파일이 이미 있습니다: {}", p.display())),
        ExportOutcome::Written(p) => Some(format!("lrc 파일을 만들었습니다: {}", p.display())),
        ExportOutcome::Failed(p) => Some(format!("lrc 파일을 만들 수 없습니다: {}", p.display())),
    }
}

fn cmd_config() -> Result<()> {
    let mut cfg = config::load_config();
    let current = cfg.lyrics.clone();

    println!("가사 옵션 설정\n");
    println!("[태그 가사]");

    let add_unsynced_lyrics = Confirm::new()
        .with_prompt("일반 가사를 받아 태그에 기록")
        .default(current.add_unsynced_lyrics)
        .interact()?;

    let never_replace_lyrics = Confirm::new()
        .with_prompt("이미 있는 가사 태그는 절대 바꾸지 않기")
        .default(current.never_replace_lyrics)
        .interact()?;

    println!("\n[lrc 파일]");
    println!("사용 가능한 자리표시자: %filename%, %filename_ext%, %directory%, %folderpath%, %filepath%, %<태그>%");

    let exported_lrc_filename: String = Input::new()
        .with_prompt("lrc 파일명 패턴")
        .with_initial_text(current.exported_lrc_filename.clone())
        .interact_text()?;

    let exported_lrc = Confirm::new()
        .with_prompt("저장할 때 lrc 파일로 내보내기 (싱크 가사 우선)")
        .default(current.exported_lrc)
        .interact()?;

    let never_replace_lrc = Confirm::new()
        .with_prompt("이미 있는 lrc 파일은 절대 바꾸지 않기")
        .default(current.never_replace_lrc)
        .interact()?;

    cfg.lyrics = LyricsSettings {
        add_unsynced_lyrics,
        add_synced_lyrics: current.add_synced_lyrics,
        never_replace_lyrics,
        exported_lrc_filename,
        exported_lrc,
        never_replace_lrc,
    };

    config::save_config(&cfg)?;
    println!("\n설정이 저장되었습니다!");
    Ok(())
}
