use vim_sidefx::render::{map_command, unmap_command};
use vim_sidefx::synth::{plan, synthesize};
use vim_sidefx::{
    ActionKind, Call, Capture, CommandHost, CountArg, CountFlavor, Error, ExprForm, InputMode,
    Mechanism, ModeGroup, Options, SideEffects, Strategy, Trigger,
};

mod support;
use support::recording_sink::RecordingSink;

const SELECTION_MODES: [InputMode; 3] =
    [InputMode::VisualSelect, InputMode::Visual, InputMode::Select];

#[test]
fn test_every_pair_has_a_plan() {
    for kind in ActionKind::ALL {
        for mode in InputMode::ALL {
            let plan = plan(kind, mode);
            // Shape of the call must match the callback's arity.
            match plan.call {
                Call::Once | Call::Repeat(_) => assert_eq!(kind.arity(), 0),
                Call::WithCount(_) => assert_eq!(kind.arity(), 1),
            }
        }
    }
}

#[test]
fn test_idempotent_never_touches_repeat_state() {
    for mode in [InputMode::Normal].into_iter().chain(SELECTION_MODES) {
        let plan = plan(ActionKind::Idempotent, mode);
        assert_eq!(plan.mechanism, Mechanism::Expression(ExprForm::NonEffecting));
        assert_eq!(plan.call, Call::Once);
        assert!(!plan.mechanism.touches_repeat_state());
    }
    let op = plan(ActionKind::Idempotent, InputMode::OperatorPending);
    assert_eq!(op.mechanism, Mechanism::CommandLine { cancel_range: false });
    assert_eq!(op.call, Call::Once);
}

#[test]
fn test_repeatable_plans() {
    let count1 = CountArg::live(CountFlavor::AtLeastOne);
    for mode in [InputMode::Normal].into_iter().chain(SELECTION_MODES) {
        let plan = plan(ActionKind::Repeatable, mode);
        assert_eq!(plan.mechanism, Mechanism::Expression(ExprForm::Consuming));
        assert_eq!(plan.call, Call::Repeat(count1));
    }
    let op = plan(ActionKind::Repeatable, InputMode::OperatorPending);
    assert_eq!(op.mechanism, Mechanism::CommandLine { cancel_range: false });
    assert_eq!(op.call, Call::Repeat(count1));
}

#[test]
fn test_count_kinds_read_live_except_in_selection_modes() {
    for (kind, flavor) in [
        (ActionKind::WithCount, CountFlavor::Raw),
        (ActionKind::WithCount1, CountFlavor::AtLeastOne),
    ] {
        let normal = plan(kind, InputMode::Normal);
        assert_eq!(normal.mechanism, Mechanism::CommandLine { cancel_range: true });
        assert_eq!(normal.call, Call::WithCount(CountArg::live(flavor)));

        for mode in SELECTION_MODES {
            let sel = plan(kind, mode);
            assert_eq!(sel.mechanism, Mechanism::Expression(ExprForm::NonEffecting));
            assert_eq!(sel.call, Call::WithCount(CountArg::literal(flavor)));
        }

        let op = plan(kind, InputMode::OperatorPending);
        assert_eq!(op.mechanism, Mechanism::CommandLine { cancel_range: false });
        assert_eq!(op.call, Call::WithCount(CountArg::live(flavor)));
    }
}

#[test]
fn test_pending_operator_never_cancels_range() {
    for kind in ActionKind::ALL {
        let plan = plan(kind, InputMode::OperatorPending);
        assert_eq!(plan.mechanism.strategy(), Strategy::CommandLine);
        assert_eq!(plan.mechanism, Mechanism::CommandLine { cancel_range: false });
    }
}

#[test]
fn test_literal_capture_only_in_selection_group() {
    for kind in ActionKind::ALL {
        for mode in InputMode::ALL {
            let literal = plan(kind, mode)
                .call
                .count_arg()
                .is_some_and(|arg| arg.capture == Capture::Literal);
            if literal {
                assert_eq!(mode.group(), ModeGroup::Selection);
            }
        }
    }
}

#[test]
fn test_render_commands() {
    let id = vim_sidefx::ActionId::FIRST;
    let trigger = Trigger::new("demo");

    let spec = synthesize(id, ActionKind::Idempotent, InputMode::Normal, trigger.clone());
    assert_eq!(
        map_command(&spec),
        "nnoremap <silent> <unique> <Plug>(demo) @=sidefx#expr_call0(1)<CR>"
    );

    let spec = synthesize(id, ActionKind::Repeatable, InputMode::VisualSelect, trigger.clone());
    assert_eq!(
        map_command(&spec),
        "vnoremap <silent> <unique> <expr> <Plug>(demo) sidefx#expr_repeat0(1, v:count1)"
    );

    let spec = synthesize(id, ActionKind::WithCount, InputMode::Normal, trigger.clone());
    assert_eq!(
        map_command(&spec),
        "nnoremap <silent> <unique> <Plug>(demo) :<C-u>call sidefx#cmd_call1(1, v:count)<CR>"
    );

    let spec = synthesize(id, ActionKind::WithCount1, InputMode::Visual, trigger.clone());
    assert_eq!(
        map_command(&spec),
        concat!(
            "xnoremap <silent> <unique> <expr> <Plug>(demo) ",
            "'@=sidefx#expr_call1(1, ' . v:count1 . \")\\<CR>\"",
        )
    );

    let spec = synthesize(id, ActionKind::Repeatable, InputMode::OperatorPending, trigger.clone());
    assert_eq!(
        map_command(&spec),
        "onoremap <silent> <unique> <Plug>(demo) :call sidefx#cmd_repeat0(1, v:count1)<CR>"
    );

    assert_eq!(
        unmap_command(InputMode::Select, &trigger),
        "sunmap <Plug>(demo)"
    );
}

#[test]
fn test_trigger_routes_to_registered_name() {
    let fx = SideEffects::new(CommandHost::new(RecordingSink::new()));
    let named = fx.set_up_idempotent(|| {}, Options::new().named("jump")).unwrap();
    let unnamed = fx.set_up_idempotent(|| {}, Options::new()).unwrap();

    let trigger = fx.trigger_of(named).unwrap();
    assert_eq!(trigger.name(), "jump");
    assert_eq!(trigger.keys(), "<Plug>(jump)");
    assert_eq!(fx.trigger_of(unnamed).unwrap().name(), fx.name_of(unnamed).unwrap());
}

#[test]
fn test_command_host_installs_and_removes() {
    let fx = SideEffects::new(CommandHost::new(RecordingSink::new()));
    let id = fx
        .set_up_with_count(|_| {}, Options::new().named("cmd").in_modes("no").unwrap())
        .unwrap();
    fx.clear_one(id).unwrap();

    let host = fx.host();
    let commands = &host.sink().commands;
    assert_eq!(commands.len(), 4);
    assert!(commands[0].starts_with("nnoremap <silent> <unique> <Plug>(cmd) :<C-u>call"));
    assert!(commands[1].starts_with("onoremap <silent> <unique> <Plug>(cmd) :call"));
    assert_eq!(commands[2], "nunmap <Plug>(cmd)");
    assert_eq!(commands[3], "ounmap <Plug>(cmd)");
}

#[test]
fn test_command_host_maps_e227_to_duplicate_trigger() {
    let fx = SideEffects::new(CommandHost::new(RecordingSink::new()));
    fx.host_mut()
        .sink_mut()
        .fail_next("E227: Mapping already exists for <Plug>(busy)");

    let err = fx
        .set_up_idempotent(|| {}, Options::new().named("busy"))
        .unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateTrigger {
            mode: InputMode::Normal,
            trigger: Trigger::new("busy"),
        }
    );
    assert!(fx.name_available("busy"));
}

#[test]
fn test_command_host_reports_other_failures() {
    let fx = SideEffects::new(CommandHost::new(RecordingSink::new()));
    fx.host_mut().sink_mut().fail_next("E488: Trailing characters");

    let err = fx
        .set_up_idempotent(|| {}, Options::new())
        .unwrap_err();
    assert_eq!(err, Error::Host("E488: Trailing characters".to_string()));
    assert!(fx.is_empty());
}
