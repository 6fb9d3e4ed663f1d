use ahatouch_core::Route;

#[test]
fn parses_known_pages() {
    assert_eq!(Route::parse(""), Route::Portal);
    assert_eq!(Route::parse("#/ahatouch"), Route::Home);
    assert_eq!(Route::parse("/ahatouch/"), Route::Home);
    assert_eq!(
        Route::parse("#/ahatouch/puzzle/play?id=flowers_002&cat=flowers"),
        Route::PuzzlePlay {
            id: "flowers_002".to_string(),
            cat: Some("flowers".to_string()),
        }
    );
    assert_eq!(
        Route::parse("/ahatouch/quiz?cat="),
        Route::Quiz { cat: None }
    );
    assert_eq!(
        Route::parse("/ahatouch/my/play"),
        Route::MyPlay { id: String::new() }
    );
    assert_eq!(Route::parse("/market"), Route::NotFound);
}

#[test]
fn href_round_trips() {
    let routes = [
        Route::PuzzlePicker {
            cat: Some("world".to_string()),
        },
        Route::MyPlay {
            id: "user 1/2".to_string(),
        },
        Route::MyPlay {
            id: "猫&犬=1".to_string(),
        },
        Route::ChirarizumuPlay {
            id: "chira_1_ff".to_string(),
        },
        Route::Chirarizumu,
    ];
    for route in routes {
        assert_eq!(Route::parse(&route.href()), route);
    }
    assert_eq!(
        Route::MyPlay {
            id: "a b".to_string()
        }
        .href(),
        "#/ahatouch/my/play?id=a+b"
    );
    assert_eq!(
        Route::Quiz {
            cat: Some("猫".to_string())
        }
        .href(),
        "#/ahatouch/quiz?cat=%E7%8C%AB"
    );
}

#[test]
fn query_values_are_form_decoded() {
    let id_of = |raw: &str| match Route::parse(raw) {
        Route::MyPlay { id } => id,
        other => panic!("unexpected route {other:?}"),
    };
    assert_eq!(id_of("/ahatouch/my/play?x=1&id=abc"), "abc");
    assert_eq!(id_of("/ahatouch/my/play?id=%E7%8C%AB"), "猫");
    assert_eq!(id_of("/ahatouch/my/play?id=a+b%2"), "a b%2");
    assert_eq!(id_of("/ahatouch/my/play?id=first&id=second"), "first");
    assert_eq!(id_of("/ahatouch/my/play?x=1"), "");
}

#[test]
fn malformed_escapes_stay_literal() {
    let id_of = |raw: &str| match Route::parse(raw) {
        Route::MyPlay { id } => id,
        other => panic!("unexpected route {other:?}"),
    };
    assert_eq!(id_of("/ahatouch/my/play?id=%G1"), "%G1");
    // `+` is a space in a query, never a sign on the escape digits.
    assert_eq!(id_of("/ahatouch/my/play?id=%+5"), "% 5");
    assert_eq!(id_of("/ahatouch/my/play?id=x%-1"), "x%-1");
}
