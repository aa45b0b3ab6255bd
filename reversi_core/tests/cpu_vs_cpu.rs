//! 結合テスト: コンピュータ同士の対戦が終局まで進み、各手で盤面の不変条件が保たれることを確認する。

/// 統合テスト本体。
#[cfg(test)]
mod tests {
    use reversi_core::ai::{Difficulty, Opponent};
    use reversi_core::engine::movegen::legal_moves;
    use reversi_core::engine::{self, Color, GameStatus, Square};
    use reversi_core::local::{ComputerOptions, Controller, Mode, NullObserver, Phase};

    /// 1局分の記録。
    type Record = Vec<(Color, Option<Square>)>;

    /// 着手前後の石数が「打った側 +1+反転数、相手 −反転数」になっていることを確認する。
    fn assert_counts_after_move(before: engine::Board, after: engine::Board, side: Color, flips: u32) {
        let opponent = side.opponent();
        assert_eq!(after.count(side), before.count(side) + 1 + flips);
        assert_eq!(after.count(opponent), before.count(opponent) - flips);
        assert_eq!(
            after.occupied().count_ones(),
            before.occupied().count_ones() + 1
        );
    }

    /// 2つの難易度で1局打ち切り、手順を返す。
    fn play_game(black: Difficulty, white: Difficulty, seed: u64, depth: u8) -> (engine::Game, Record) {
        let mut game = engine::Game::initial();
        let mut black_agent = Opponent::new(black, seed, depth);
        let mut white_agent = Opponent::new(white, seed.wrapping_add(1), depth);
        let mut record = Record::new();

        // リバーシは最大60手（最初の4石を除く）だが、パスもあるので余裕を見て回す。
        for _turn in u16::MIN..200 {
            if game.is_game_over() {
                break;
            }

            let side = game.side_to_move();
            let board = game.board();
            let legal = game.legal_moves();
            assert!(
                legal.iter().all(|mv| board.piece_at(mv.square()).is_none()),
                "legal moves must target empty squares"
            );

            let agent = match side {
                Color::Black => &mut black_agent,
                Color::White => &mut white_agent,
            };

            match agent.choose(board, side, &legal) {
                Some(mv) => {
                    assert!(legal.contains(&mv), "agent must select a legal move, got={mv:?}");
                    let played = game.play(mv.square());
                    assert!(played.is_ok(), "play must succeed, got={played:?}");
                    assert_counts_after_move(board, game.board(), side, mv.flip_count());
                    record.push((side, Some(mv.square())));
                }
                None => {
                    let passed = game.pass();
                    assert!(passed.is_ok(), "pass must succeed, got={passed:?}");
                    record.push((side, None));
                }
            }
        }

        let status = game.status();
        assert!(
            matches!(status, GameStatus::GameOver(_)),
            "game did not finish within turn limit, status={status:?}"
        );
        (game, record)
    }

    /// 終局局面では双方とも合法手が無いことを確認する。
    fn assert_terminal(game: &engine::Game) {
        let board = game.board();
        assert!(legal_moves(board, Color::Black).is_empty());
        assert!(legal_moves(board, Color::White).is_empty());

        if let GameStatus::GameOver(outcome) = game.status() {
            let total = outcome.scores.black + outcome.scores.white;
            assert!(total <= 64, "total stones must be <= 64, got={total}");
            assert_eq!(outcome.winner, engine::Winner::from_scores(outcome.scores));
        }
    }

    /// `random` 同士が終局まで進む。
    #[test]
    fn random_vs_random_finishes() {
        for (seed_index, seed) in [u64::MIN, 42, 4242].into_iter().enumerate() {
            let (game, record) = play_game(Difficulty::VeryEasy, Difficulty::VeryEasy, seed, 2);
            assert_terminal(&game);
            assert!(!record.is_empty(), "seed #{seed_index} produced no moves");
        }
    }

    /// `random vs minimax` が終局まで進む。
    #[test]
    fn random_vs_minimax_finishes() {
        let (game, _record) = play_game(Difficulty::VeryEasy, Difficulty::Hard, 7, 2);
        assert_terminal(&game);
    }

    /// `greedy vs positional` が終局まで進む。
    #[test]
    fn greedy_vs_positional_finishes() {
        let (game, _record) = play_game(Difficulty::Easy, Difficulty::Medium, 0, 2);
        assert_terminal(&game);
    }

    /// 記録した手順を再生すると同じ終局になる。
    #[test]
    fn replaying_a_record_is_deterministic() {
        let (played, record) = play_game(Difficulty::VeryEasy, Difficulty::Medium, 11, 2);

        let mut replay = engine::Game::initial();
        for (side, square) in &record {
            assert_eq!(replay.side_to_move(), *side);
            let result = match square {
                Some(target) => replay.play(*target).map(|turn| turn.status),
                None => replay.pass(),
            };
            assert!(result.is_ok(), "replayed move must succeed, got={result:?}");
        }

        assert_eq!(replay, played);
    }

    /// 同じシードの `random` 同士は同じ手順になる。
    #[test]
    fn same_seed_same_game() {
        let (_, first) = play_game(Difficulty::VeryEasy, Difficulty::VeryEasy, 99, 2);
        let (_, second) = play_game(Difficulty::VeryEasy, Difficulty::VeryEasy, 99, 2);
        assert_eq!(first, second);
    }

    /// 描画なしの `Controller` でも、どの組み合わせでも終局まで進む。
    #[test]
    fn headless_controller_finishes_every_pairing() {
        let levels = [
            Difficulty::VeryEasy,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
        ];
        for black in levels {
            for white in levels {
                let mode = Mode::ComputerVsComputer { black, white };
                let options = ComputerOptions { depth: 1, seed: 5 };
                let mut controller = Controller::new(mode, options, NullObserver);

                for _ply in u16::MIN..200 {
                    if !controller.is_computer_turn() {
                        break;
                    }
                    let played = controller.play_computer_turn();
                    assert!(played.is_ok(), "{black} vs {white}: {played:?}");
                }

                assert!(
                    matches!(controller.phase(), Phase::GameOver(_)),
                    "{black} vs {white} did not finish"
                );
                assert_terminal(controller.game());
            }
        }
    }
}
