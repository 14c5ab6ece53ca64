mod common;

use common::{admin_row, create_test_app, user, CATS_SOURCE};
use insta::assert_snapshot;
use mindmap_tui::actions::{execute_action, Action};
use mindmap_tui::api::{CacheEntry, ImageResult};
use mindmap_tui::app::{AppMode, AppState};
use mindmap_tui::diagram::parse_mindmap;
use mindmap_tui::flow::FlowState;
use mindmap_tui::{ui, Route};
use ratatui::{backend::TestBackend, Terminal};

fn draw(app: &mut AppState, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();

    terminal.draw(|frame| ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn rendered_app(images: Vec<ImageResult>) -> AppState {
    let mut app = create_test_app(Some(user("ada@example.com", false)));
    app.flow.form.topic = "Cats".into();
    let job = app.diagram.begin_render(CATS_SOURCE);
    app.diagram
        .finish_render(job.render_id, parse_mindmap(&job.source));
    let seq = app.gallery.begin_fetch();
    app.gallery.apply(seq, images);
    app
}

#[test]
fn test_logged_out_generator_shows_login_card() {
    let mut app = create_test_app(None);
    let screen = draw(&mut app, 100, 30);

    assert!(screen.contains("Log in to Generate Mind Maps"));
    assert!(screen.contains("No Mind Map Generated Yet"));
    assert!(screen.contains("not logged in"));
}

#[test]
fn test_pending_probe_shows_checking_state() {
    let mut app = AppState::new(mindmap_tui::AppConfig::default());
    let screen = draw(&mut app, 100, 30);

    assert!(screen.contains("checking session..."));
    assert!(!screen.contains("Log in to Generate Mind Maps"));
}

#[test]
fn test_logged_in_form_shows_modes_and_topic() {
    let mut app = create_test_app(Some(user("ada@example.com", false)));
    app.flow.form.topic = "Photosynthesis".into();
    let screen = draw(&mut app, 100, 30);

    assert!(screen.contains("Simple Mind Map"));
    assert!(screen.contains("Analogy-Based"));
    assert!(screen.contains("Photosynthesis"));
    assert!(screen.contains("ada@example.com"));
}

#[test]
fn test_rendered_map_without_images() {
    let mut app = rendered_app(Vec::new());
    let screen = draw(&mut app, 100, 30);

    assert!(screen.contains("Care"));
    assert!(screen.contains("Food"));
    assert!(screen.contains("No related images found."));
    assert!(!screen.contains("No Mind Map Generated Yet"));
}

#[test]
fn test_lightbox_shows_alt_text_and_position() {
    let images = vec![
        ImageResult {
            url: "https://img.test/1.jpg".into(),
            alt_text: "Sleeping cat".into(),
        },
        ImageResult {
            url: "https://img.test/2.jpg".into(),
            alt_text: "Jumping cat".into(),
        },
    ];
    let mut app = rendered_app(images);
    execute_action(Action::OpenLightbox, &mut app).unwrap();
    execute_action(Action::LightboxNext, &mut app).unwrap();

    let screen = draw(&mut app, 100, 30);
    assert!(screen.contains("Jumping cat"));
    assert!(screen.contains("2/2"));
    assert!(screen.contains("https://img.test/2.jpg"));
}

#[test]
fn test_rate_limit_banner() {
    let mut app = create_test_app(Some(user("ada@example.com", false)));
    app.flow.form.topic = "Cats".into();
    execute_action(Action::Submit, &mut app).unwrap();
    execute_action(
        Action::GenerationFinished {
            seq: app.flow.latest_seq(),
            result: Err(mindmap_tui::api::GenerateError::RateLimited("limit".into())),
        },
        &mut app,
    )
    .unwrap();
    assert_eq!(app.flow.state(), &FlowState::RateLimited);

    let screen = draw(&mut app, 100, 30);
    assert!(screen.contains("Limit Reached"));
}

#[test]
fn test_admin_route_denies_non_admin() {
    let mut app = create_test_app(Some(user("ada@example.com", false)));
    app.route = Route::Admin;
    let screen = draw(&mut app, 100, 30);

    assert!(screen.contains("Access Denied"));
    assert!(!screen.contains("Sessions"));
}

#[test]
fn test_admin_dashboard_lists_sessions_and_cache() {
    let mut app = create_test_app(Some(user("root@example.com", true)));
    app.route = Route::Admin;
    app.admin.finish_sessions(Ok(vec![
        admin_row("ada@example.com", "Ada", 1, 5, true),
        admin_row("bob@example.com", "Bob", 5, 5, false),
    ]));
    app.admin
        .finish_cache(Ok(vec![CacheEntry::new("cats", "simple")]));

    let screen = draw(&mut app, 160, 30);
    assert!(screen.contains("Active Users: 2"));
    assert!(screen.contains("(1 online / 1 offline)"));
    assert!(screen.contains("ada@example.com"));
    assert!(screen.contains("bob@example.com"));
    assert!(screen.contains("cats (simple)"));
}

#[test]
fn test_help_screen() {
    let mut app = create_test_app(None);
    app.mode = AppMode::Help;
    let screen = draw(&mut app, 100, 40);

    assert!(screen.contains("Mind Map AI Help"));
    assert!(screen.contains("Press ESC or q to close help"));
}

#[test]
fn test_status_line_while_editing_topic() {
    let mut app = create_test_app(Some(user("ada@example.com", false)));
    execute_action(
        Action::EditField(mindmap_tui::app::InputField::Topic),
        &mut app,
    )
    .unwrap();
    for c in "Sun".chars() {
        execute_action(Action::TypeChar(c), &mut app).unwrap();
    }

    let screen = draw(&mut app, 80, 24);
    let status = screen.lines().last().unwrap().trim_end();
    assert_snapshot!(status, @"Edit: Topic: Sun▌");
}

#[test]
fn test_outline_of_rendered_map() {
    let app = rendered_app(Vec::new());
    let diagram = app.diagram.diagram().unwrap();

    assert_snapshot!(diagram.outline(diagram.root).trim_end(), @r"
    Cats
      Care
        Food
      Play
    ");
}
