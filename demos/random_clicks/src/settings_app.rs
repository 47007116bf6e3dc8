use gymui_core::*;

const SCREEN: BoundingBox = BoundingBox::new(0, 0, 800, 600);

/// Two tabbed pages plus a confirmation popup.
///
/// The root is a frame whose children are the tab buttons, both pages and
/// the popup. `Show` switches pages; `Open` raises the popup.
pub fn settings_app() -> Result<Box<dyn Widget>> {
    let mut root = Container::page(
        "settings",
        SCREEN,
        RewardTemplate::map([
            ("tab", RewardTemplate::tags(["general", "language"])),
            ("saved", RewardTemplate::Leaf),
        ]),
    )?;

    let confirm = Container::popup(
        "confirm",
        BoundingBox::new(250, 200, 300, 150),
        RewardTemplate::map([("answer", RewardTemplate::tags(["yes", "no"]))]),
    )?
    .with(Button::new(
        "yes",
        BoundingBox::new(280, 300, 80, 30),
        Action::register(["answer", "yes"])
            .then(Action::Close)
            .then(Action::emit("saved")),
    ))
    .with(Button::new(
        "no",
        BoundingBox::new(440, 300, 80, 30),
        Action::register(["answer", "no"]).then(Action::Close),
    ));

    let general = Container::page("general", BoundingBox::new(0, 41, 800, 510), RewardTemplate::empty())?
        .with(CheckBox::new("notifications", BoundingBox::new(20, 60, 20, 20))?.checked_by_default(true))
        .with(CheckBox::new("dark mode", BoundingBox::new(20, 100, 20, 20))?)
        .with(
            RadioGroup::new(vec![
                RadioButton::new("small", BoundingBox::new(20, 160, 20, 20)),
                RadioButton::new("medium", BoundingBox::new(60, 160, 20, 20)),
                RadioButton::new("large", BoundingBox::new(100, 160, 20, 20)),
            ])?
            .default_selected(1),
        );

    let language = Container::page("language", BoundingBox::new(0, 41, 800, 510), RewardTemplate::empty())?
        .initially_open(false)
        .with(
            Dropdown::new(
                BoundingBox::new(20, 60, 160, 24),
                ["English", "Deutsch", "Français", "Español", "日本語"]
                    .into_iter()
                    .map(Item::new)
                    .collect(),
            )?
            .randomize_visibility(true),
        );

    let general = root.push(general);
    let language = root.push(language);
    let confirm = root.push(confirm);
    root.push(Button::new(
        "general",
        BoundingBox::new(0, 0, 100, 40),
        Action::register(["tab", "general"]).then(Action::Show(general)),
    ));
    root.push(Button::new(
        "language",
        BoundingBox::new(100, 0, 100, 40),
        Action::register(["tab", "language"]).then(Action::Show(language)),
    ));
    root.push(Button::new(
        "save",
        BoundingBox::new(680, 560, 100, 30),
        Action::register(["saved"]).then(Action::Open(confirm)),
    ));

    Ok(Box::new(root))
}
