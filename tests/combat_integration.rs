//! Combat integration tests
//!
//! Table lookups, dispositions and dice driven through a live game.

use gettysburg_engine::combat::{
    Battle, CombatResult, CombatTable, DieFace, Resolution, RetreatOutcome, ScriptedDie,
    SeededDie, UNOPPOSED_RATIO,
};
use gettysburg_engine::{
    ArmyId, Coordinate, Direction, Game, GameConfig, GameStep, ReinforcementSchedule,
    ScenarioControl, Unit, UnitKey, UnitProfile,
};

fn c(x: i32, y: i32) -> Coordinate {
    Coordinate::new(x, y).unwrap()
}

fn face(pips: u8) -> DieFace {
    DieFace::new(pips).unwrap()
}

fn unit(army: ArmyId, leader: &str, cf: u32, mf: u32, facing: Direction) -> Unit {
    Unit::new(UnitKey::new(army, leader), UnitProfile::new(cf, mf), facing)
}

fn scripted_game(pips: &[u8]) -> Game {
    let dice = ScriptedDie::new(pips.iter().map(|p| face(*p)));
    Game::with_dice(GameConfig::new(), ReinforcementSchedule::empty(), Box::new(dice)).unwrap()
}

#[test]
fn test_unopposed_attack_on_every_face() {
    let table = CombatTable::standard();
    let expected = [
        CombatResult::DefenderEliminated,
        CombatResult::DefenderRetreats,
        CombatResult::DefenderEliminated,
        CombatResult::DefenderEliminated,
        CombatResult::DefenderEliminated,
        CombatResult::DefenderEliminated,
    ];
    for (f, result) in DieFace::all().zip(expected) {
        assert_eq!(table.lookup(f, UNOPPOSED_RATIO), result, "face {f}");
    }
}

#[test]
fn test_hopeless_attack_on_every_face() {
    let table = CombatTable::standard();
    for f in DieFace::all() {
        assert_eq!(table.lookup(f, 0.1), CombatResult::AttackerEliminated, "face {f}");
    }
}

#[test]
fn test_even_odds_column() {
    let table = CombatTable::standard();
    let column: Vec<CombatResult> = DieFace::all().map(|f| table.lookup(f, 1.0)).collect();
    assert_eq!(
        column,
        vec![
            CombatResult::DefenderEliminated,
            CombatResult::AttackerRetreats,
            CombatResult::DefenderRetreats,
            CombatResult::DefenderRetreats,
            CombatResult::Exchange,
            CombatResult::AttackerEliminated,
        ]
    );
}

#[test]
fn test_battle_ratio_edges() {
    let empty = Battle::default();
    assert_eq!(empty.ratio(), 1.0);
    assert_eq!(empty.attacking_army(), None);

    let hq_only = Battle::new(
        vec![unit(ArmyId::Union, "Meade", 0, 0, Direction::North)],
        vec![unit(ArmyId::Confederate, "Lee", 0, 0, Direction::South)],
    );
    assert_eq!(hq_only.ratio(), 1.0);

    let unopposed = Battle::new(
        vec![unit(ArmyId::Union, "Buford", 2, 4, Direction::North)],
        vec![unit(ArmyId::Confederate, "Lee", 0, 0, Direction::South)],
    );
    assert_eq!(unopposed.ratio(), UNOPPOSED_RATIO);

    let two_to_one = Battle::new(
        vec![
            unit(ArmyId::Confederate, "Heth", 4, 2, Direction::East),
            unit(ArmyId::Confederate, "Pender", 4, 2, Direction::East),
        ],
        vec![unit(ArmyId::Union, "Wadsworth", 4, 2, Direction::West)],
    );
    assert_eq!(two_to_one.ratio(), 2.0);
    assert_eq!(two_to_one.attacking_army(), Some(ArmyId::Confederate));
}

#[test]
fn test_pure_resolution_from_face() {
    let battle = Battle::new(
        vec![
            unit(ArmyId::Union, "A", 2, 2, Direction::East),
            unit(ArmyId::Union, "B", 2, 2, Direction::West),
            unit(ArmyId::Union, "C", 3, 2, Direction::South),
        ],
        vec![unit(ArmyId::Confederate, "D", 4, 2, Direction::South)],
    );
    let table = CombatTable::standard();

    // 7:4 on face 5 is an exchange
    let res = Resolution::from_face(&battle, &table, face(5));
    assert_eq!(res.result, CombatResult::Exchange);
    assert_eq!(res.face, Some(face(5)));
    let lost: Vec<&str> = res.eliminated().map(Unit::leader).collect();
    assert_eq!(lost, vec!["A", "B", "D"]);

    // Same inputs, same answer
    assert_eq!(res, Resolution::from_face(&battle, &table, face(5)));
}

#[test]
fn test_scripted_faces_drive_game_battles() {
    let mut game = scripted_game(&[1, 6]);
    let buford = unit(ArmyId::Union, "Buford", 1, 4, Direction::East);
    let heth = unit(ArmyId::Confederate, "Heth", 4, 2, Direction::West);
    game.put_unit_at(&buford, c(10, 10));
    game.put_unit_at(&heth, c(11, 10));
    game.set_step(GameStep::UnionBattle);

    // 1:4 on face 1: attacker falls back
    let battle = game.battles_to_resolve().unwrap();
    let res = game.resolve_battle(&battle).unwrap();
    assert_eq!(res.face, Some(face(1)));
    assert_eq!(res.result, CombatResult::AttackerRetreats);
    assert_eq!(game.where_is_unit(&buford.key), Some(c(9, 10)));

    // Both sit out the rest of the turn; next turn Heth follows up
    // and attacks 4:1 on face 6
    for _ in 0..4 {
        game.end_step().unwrap();
    }
    assert_eq!(game.current_step(), GameStep::UnionBattle);
    assert!(game.battles_to_resolve().is_none());
    game.end_step().unwrap();
    game.move_unit(&heth.key, c(11, 10), c(10, 10)).unwrap();
    game.end_step().unwrap();
    let battle = game.battles_to_resolve().unwrap();
    let res = game.resolve_battle(&battle).unwrap();
    assert_eq!(res.face, Some(face(6)));
    assert_eq!(res.result, CombatResult::DefenderEliminated);
    assert_eq!(game.where_is_unit(&buford.key), None);
    assert_eq!(game.where_is_unit(&heth.key), Some(c(10, 10)));
}

#[test]
fn test_scripted_result_wins_over_die() {
    let mut game = scripted_game(&[6]);
    game.put_unit_at(&unit(ArmyId::Union, "A", 4, 2, Direction::East), c(10, 10));
    game.put_unit_at(&unit(ArmyId::Confederate, "B", 1, 2, Direction::West), c(11, 10));
    game.set_step(GameStep::UnionBattle);
    game.script_results(vec![CombatResult::AttackerEliminated]);

    let battle = game.battles_to_resolve().unwrap();
    let res = game.resolve_battle(&battle).unwrap();
    assert_eq!(res.result, CombatResult::AttackerEliminated);
    assert_eq!(res.face, None);
    assert!(game.units_at(c(10, 10)).is_empty());
}

#[test]
fn test_retreats_applied_one_at_a_time() {
    let mut game = scripted_game(&[]);
    // Both defenders fall back towards (10, 11) first; Left gets there first
    let left = unit(ArmyId::Confederate, "Left", 2, 2, Direction::North);
    let right = unit(ArmyId::Confederate, "Right", 2, 2, Direction::NorthEast);
    game.put_unit_at(&left, c(10, 10));
    game.put_unit_at(&right, c(11, 10));
    game.put_unit_at(&unit(ArmyId::Union, "Gibbon", 3, 2, Direction::South), c(10, 9));
    game.put_unit_at(&unit(ArmyId::Union, "Hays", 3, 2, Direction::South), c(11, 9));
    game.set_step(GameStep::UnionBattle);
    game.script_results(vec![CombatResult::DefenderRetreats]);

    let battle = game.battles_to_resolve().unwrap();
    let res = game.resolve_battle(&battle).unwrap();

    assert_eq!(res.retreats.len(), 2);
    assert!(res
        .retreats
        .iter()
        .all(|r| matches!(r.outcome, RetreatOutcome::Moved { .. })));
    assert_eq!(game.where_is_unit(&left.key), Some(c(10, 11)));
    assert_eq!(game.where_is_unit(&right.key), Some(c(11, 11)));
}

#[test]
fn test_seeded_die_replays() {
    use gettysburg_engine::combat::DieRoller;

    let mut a = SeededDie::new(1863);
    let mut b = SeededDie::from_seed(Some(1863));
    for _ in 0..50 {
        assert_eq!(a.roll(), b.roll());
    }
}

#[test]
fn test_results_serialize_with_table_codes() {
    let codes: Vec<String> = [
        CombatResult::AttackerEliminated,
        CombatResult::AttackerRetreats,
        CombatResult::DefenderRetreats,
        CombatResult::DefenderEliminated,
        CombatResult::Exchange,
    ]
    .iter()
    .map(|r| serde_json::to_string(r).unwrap())
    .collect();
    assert_eq!(
        codes,
        vec!["\"AELIM\"", "\"ABACK\"", "\"DBACK\"", "\"DELIM\"", "\"EXCHANGE\""]
    );
}
