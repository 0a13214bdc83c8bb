//! Routines end to end against the recording driver.

use std::path::Path;
use std::time::{Duration, Instant};

use embedded_graphics::prelude::*;
use image::{GrayImage, Luma};

use epaper_badge::epd2in13bc::{HEIGHT, WIDTH};
use epaper_badge::font::Typeface;
use epaper_badge::mocks::{DriverCall, Operation, RecordingDriver};
use epaper_badge::routines::{files, WINDOW_OFFSET};
use epaper_badge::{Config, DisplayError, Interrupt, Routine, Session, SessionError, SessionState};

const LINE_BYTES: usize = (WIDTH as usize).div_ceil(8);

fn session_in(dir: &Path, driver: RecordingDriver) -> (Session<RecordingDriver>, Interrupt) {
    let config = Config {
        resource_dir: dir.to_path_buf(),
        ..Config::without_settle()
    };
    let interrupt = Interrupt::new();
    let session = Session::with_typeface(driver, config, interrupt.clone(), Typeface::Mono);
    (session, interrupt)
}

fn session() -> Session<RecordingDriver> {
    session_in(Path::new("/nonexistent"), RecordingDriver::epd2in13bc()).0
}

/// Whether a landscape pixel is inked in a packed native buffer
fn landscape_ink(buffer: &[u8], x: u32, y: u32) -> bool {
    let (nx, ny) = (y as usize, (HEIGHT - 1 - x) as usize);
    buffer[ny * LINE_BYTES + nx / 8] & (0x80 >> (nx % 8)) == 0
}

/// Every inked landscape pixel of a packed native buffer
fn landscape_ink_points(buffer: &[u8]) -> Vec<(u32, u32)> {
    (0..WIDTH)
        .flat_map(|y| (0..HEIGHT).map(move |x| (x, y)))
        .filter(|&(x, y)| landscape_ink(buffer, x, y))
        .collect()
}

const DEJAVU_SANS_MONO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSansMono.ttf");

fn save_gray(path: &Path, width: u32, height: u32, f: impl Fn(u32, u32) -> u8) {
    GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)]))
        .save(path)
        .unwrap();
}

fn demo_resources(dir: &Path) {
    save_gray(&dir.join(files::DEMO_BLACK), HEIGHT, WIDTH, |x, _| if x < 20 { 0 } else { 255 });
    save_gray(&dir.join(files::DEMO_RED), HEIGHT, WIDTH, |_, y| if y < 10 { 0 } else { 255 });
    save_gray(&dir.join(files::DEMO_WINDOW), 100, 100, |x, y| if (x + y) % 2 == 0 { 0 } else { 255 });
}

#[test]
fn every_name_dispatches_and_unknown_falls_back() {
    for (name, routine) in [
        ("name_badge", Routine::NameBadge),
        ("badge_img", Routine::BadgeImg),
        ("clear", Routine::Clear),
        ("demo", Routine::Demo),
    ] {
        assert_eq!(Routine::resolve(Some(name)), routine);
    }
    assert_eq!(Routine::resolve(Some("nope")), Routine::NameBadge);
    assert_eq!(Routine::resolve(None), Routine::NameBadge);
}

#[test]
fn clear_routine_clears_once_and_sleeps() {
    let mut session = session();
    session.run(Routine::Clear).unwrap();

    let driver = session.driver();
    assert_eq!(
        driver.calls(),
        &[
            DriverCall::Init,
            DriverCall::Clear,
            DriverCall::Sleep,
            DriverCall::ModuleExit
        ]
    );
    assert_eq!(driver.display_count(), 0);
    assert_eq!(session.state(), SessionState::Asleep);
}

#[test]
fn name_badge_submits_red_field_with_knockout() {
    let mut session = session();
    session.run(Routine::NameBadge).unwrap();

    let driver = session.driver();
    assert_eq!(driver.display_count(), 1);
    assert_eq!(driver.clear_count(), 1);
    assert!(driver.ends_asleep());

    let (black, red) = driver.displayed().next().unwrap();
    assert_eq!(black.len(), LINE_BYTES * HEIGHT as usize);
    assert_eq!(red.len(), black.len());

    // the name is inked on the black plane from (15, 0)
    let name = landscape_ink_points(black);
    assert!(!name.is_empty());
    assert!(name.iter().all(|&(x, y)| x >= 15 && y < 30));

    // the red field is ink except where the callsign, from (10, 40), shows through
    let red_ink = landscape_ink_points(red);
    let field = (HEIGHT * WIDTH) as usize;
    assert!(red_ink.len() < field);
    for y in 0..WIDTH {
        for x in 0..HEIGHT {
            if !landscape_ink(red, x, y) {
                assert!(x >= 10 && (40..60).contains(&y), "paper at ({x}, {y})");
            }
        }
    }
}

#[test]
fn name_badge_with_truetype_font_from_resources() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(DEJAVU_SANS_MONO, dir.path().join("Font.ttc")).unwrap();
    let config = Config {
        resource_dir: dir.path().to_path_buf(),
        ..Config::without_settle()
    };
    let mut session = Session::new(RecordingDriver::epd2in13bc(), config, Interrupt::new());
    assert!(matches!(session.typeface(), Typeface::TrueType(_)));

    session.run(Routine::NameBadge).unwrap();

    let (black, red) = session.driver().displayed().next().unwrap();
    let name = landscape_ink_points(black);
    assert!(!name.is_empty());
    assert!(name.iter().all(|&(x, y)| x >= 15 && y < 30));
    assert!(name.iter().any(|&(_, y)| y <= 8));

    let mut knocked_out = 0;
    for y in 0..WIDTH {
        for x in 0..HEIGHT {
            if !landscape_ink(red, x, y) {
                assert!(x >= 10 && (40..80).contains(&y), "paper at ({x}, {y})");
                knocked_out += 1;
            }
        }
    }
    assert!(knocked_out > 0);
    assert!(session.driver().ends_asleep());
}

#[test]
fn landscape_canvas_matches_the_panel() {
    let session = session();
    let planes = session.planes(epaper_badge::Orientation::Landscape);
    assert_eq!(planes.black.size(), Size::new(HEIGHT, WIDTH));
    assert_eq!(session.panel_size(), Size::new(104, 212));
}

#[test]
fn interrupt_before_start_only_releases_the_module() {
    let (mut session, interrupt) = session_in(Path::new("/nonexistent"), RecordingDriver::epd2in13bc());
    interrupt.trigger();

    session.run(Routine::Demo).unwrap();

    assert_eq!(session.driver().calls(), &[DriverCall::ModuleExit]);
    assert_eq!(session.state(), SessionState::Asleep);
}

#[test]
fn failed_init_skips_sleep_and_releases_the_module() {
    let driver = RecordingDriver::epd2in13bc().failing_on(Operation::Init);
    let (mut session, _) = session_in(Path::new("/nonexistent"), driver);

    let err = session.run(Routine::NameBadge).unwrap_err();

    assert!(matches!(err, SessionError::Display(_)));
    assert_eq!(
        session.driver().calls(),
        &[DriverCall::Init, DriverCall::ModuleExit]
    );
    assert_eq!(session.state(), SessionState::Asleep);
}

#[test]
fn interrupt_during_settle_sleeps_the_panel() {
    let config = Config {
        settle_after_clear: Duration::from_secs(30),
        ..Config::without_settle()
    };
    let interrupt = Interrupt::new();
    let mut session = Session::with_typeface(RecordingDriver::epd2in13bc(), config, interrupt.clone(), Typeface::Mono);
    let raiser = interrupt.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(150));
        raiser.trigger();
    });

    let started = Instant::now();
    session.run(Routine::Clear).unwrap();
    handle.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(
        session.driver().calls(),
        &[
            DriverCall::Init,
            DriverCall::Clear,
            DriverCall::Sleep,
            DriverCall::ModuleExit
        ]
    );
}

#[test]
fn clear_routine_waits_for_the_panel_to_settle() {
    let config = Config {
        settle_after_clear: Duration::from_millis(150),
        ..Config::without_settle()
    };
    let mut session = Session::with_typeface(RecordingDriver::epd2in13bc(), config, Interrupt::new(), Typeface::Mono);

    let started = Instant::now();
    session.run(Routine::Clear).unwrap();

    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[test]
fn name_badge_settles_after_clear_and_submit() {
    let config = Config {
        settle_after_clear: Duration::from_millis(100),
        settle_after_submit: Duration::from_millis(100),
        ..Config::without_settle()
    };
    let mut session = Session::with_typeface(RecordingDriver::epd2in13bc(), config, Interrupt::new(), Typeface::Mono);

    let started = Instant::now();
    session.run(Routine::NameBadge).unwrap();

    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[test]
fn io_failure_is_returned_after_shutdown() {
    let driver = RecordingDriver::epd2in13bc().failing_on(Operation::Display);
    let (mut session, _) = session_in(Path::new("/nonexistent"), driver);

    let err = session.run(Routine::NameBadge).unwrap_err();

    assert!(matches!(
        err,
        SessionError::Display(DisplayError::BusWriteError)
    ));
    assert!(session.driver().ends_asleep());
    assert_eq!(session.state(), SessionState::Asleep);
}

#[test]
fn failing_sleep_still_releases_the_module() {
    let driver = RecordingDriver::epd2in13bc().failing_on(Operation::Sleep);
    let (mut session, _) = session_in(Path::new("/nonexistent"), driver);

    assert!(session.run(Routine::Clear).is_err());
    assert!(session.driver().ends_asleep());
}

#[test]
fn badge_img_without_bitmaps_fails_and_sleeps() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _) = session_in(dir.path(), RecordingDriver::epd2in13bc());

    let err = session.run(Routine::BadgeImg).unwrap_err();

    assert!(matches!(err, SessionError::Image(_)));
    assert_eq!(session.driver().display_count(), 0);
    assert!(session.driver().ends_asleep());
}

#[test]
fn badge_img_submits_the_bitmaps() {
    let dir = tempfile::tempdir().unwrap();
    save_gray(&dir.path().join(files::BADGE_BLACK), HEIGHT, WIDTH, |x, y| if (x, y) == (0, 0) { 0 } else { 255 });
    save_gray(&dir.path().join(files::BADGE_RED), HEIGHT, WIDTH, |_, _| 255);
    let (mut session, _) = session_in(dir.path(), RecordingDriver::epd2in13bc());

    session.run(Routine::BadgeImg).unwrap();

    let (black, red) = session.driver().displayed().next().unwrap();
    assert!(landscape_ink(black, 0, 0));
    assert!(!landscape_ink(black, 1, 0));
    assert!(red.iter().all(|b| *b == 0xFF));
}

#[test]
fn badge_img_rejects_bitmaps_of_the_wrong_size() {
    let dir = tempfile::tempdir().unwrap();
    save_gray(&dir.path().join(files::BADGE_BLACK), 50, 50, |_, _| 255);
    save_gray(&dir.path().join(files::BADGE_RED), 50, 50, |_, _| 255);
    let (mut session, _) = session_in(dir.path(), RecordingDriver::epd2in13bc());

    let err = session.run(Routine::BadgeImg).unwrap_err();

    assert!(matches!(err, SessionError::CanvasSize { .. }));
    assert!(session.driver().ends_asleep());
}

#[test]
fn demo_runs_four_stages_and_clears_at_both_ends() {
    let dir = tempfile::tempdir().unwrap();
    demo_resources(dir.path());
    let (mut session, _) = session_in(dir.path(), RecordingDriver::epd2in13bc());

    session.run(Routine::Demo).unwrap();

    let driver = session.driver();
    assert_eq!(driver.display_count(), 4);
    assert_eq!(driver.clear_count(), 2);
    assert_eq!(driver.calls()[0], DriverCall::Init);
    assert_eq!(driver.calls()[1], DriverCall::Clear);
    assert!(driver.ends_asleep());

    // every stage submits both planes, and stage one draws on both
    let (black, red) = driver.displayed().next().unwrap();
    assert!(black.iter().any(|b| *b != 0xFF));
    assert!(red.iter().any(|b| *b != 0xFF));
}

#[test]
fn demo_pastes_the_window_bitmap_at_its_offset() {
    let dir = tempfile::tempdir().unwrap();
    demo_resources(dir.path());
    let (mut session, _) = session_in(dir.path(), RecordingDriver::epd2in13bc());

    session.run(Routine::Demo).unwrap();

    let (black, red) = session.driver().displayed().nth(3).unwrap();
    let (ox, oy) = (WINDOW_OFFSET.x as u32, WINDOW_OFFSET.y as u32);
    for y in 0..WIDTH {
        for x in 0..HEIGHT {
            let inside = (ox..ox + 100).contains(&x) && (oy..oy + 100).contains(&y);
            let expected = inside && ((x - ox) + (y - oy)) % 2 == 0;
            assert_eq!(landscape_ink(black, x, y), expected, "pixel ({x}, {y})");
        }
    }
    assert!(red.iter().all(|b| *b == 0xFF));
}

#[test]
fn demo_missing_bitmap_stops_after_the_drawn_stages() {
    let (mut session, _) = session_in(Path::new("/nonexistent"), RecordingDriver::epd2in13bc());

    let err = session.run(Routine::Demo).unwrap_err();

    assert!(matches!(err, SessionError::Image(_)));
    assert_eq!(session.driver().display_count(), 2);
    assert!(session.driver().ends_asleep());
}
