//! Shared road network fixtures.
#![allow(dead_code)]

use autoflow::math::Point2d;
use autoflow::{Direction, IntersectionAttributes, IntersectionId, Network, RoadId};

/// Four intersections in a square, two one-way roads per edge. Every
/// intersection has two neighbours, so no traffic lights apply.
pub struct Square {
    pub network: Network,
    pub bl: IntersectionId,
    pub br: IntersectionId,
    pub tl: IntersectionId,
    pub tr: IntersectionId,
    /// bl -> br
    pub bottom_east: RoadId,
    /// br -> tr
    pub right_north: RoadId,
    /// tl -> tr
    pub top_east: RoadId,
    /// tr -> tl
    pub top_west: RoadId,
    /// bl -> tl
    pub left_north: RoadId,
}

pub fn square(speed_limit: f64) -> Square {
    let mut network = Network::new();
    let bl = add_intersection(&mut network, (0, 0));
    let br = add_intersection(&mut network, (1, 0));
    let tl = add_intersection(&mut network, (0, 1));
    let tr = add_intersection(&mut network, (1, 1));

    let (bottom_east, _) = network
        .connect(bl, br, Direction::East, 50.0, speed_limit, Point2d::new(0.0, 0.0))
        .unwrap();
    let (right_north, _) = network
        .connect(br, tr, Direction::North, 50.0, speed_limit, Point2d::new(50.0, 0.0))
        .unwrap();
    let (top_east, top_west) = network
        .connect(tl, tr, Direction::East, 50.0, speed_limit, Point2d::new(0.0, 50.0))
        .unwrap();
    let (left_north, _) = network
        .connect(bl, tl, Direction::North, 50.0, speed_limit, Point2d::new(0.0, 0.0))
        .unwrap();
    pathways_everywhere(&mut network, 1.0);

    Square {
        network,
        bl,
        br,
        tl,
        tr,
        bottom_east,
        right_north,
        top_east,
        top_west,
        left_north,
    }
}

/// A four-way intersection: one central signalised intersection with an arm
/// of two one-way roads towards each compass point.
pub struct Cross {
    pub network: Network,
    pub center: IntersectionId,
    pub west: IntersectionId,
    pub east: IntersectionId,
    pub south: IntersectionId,
    pub north: IntersectionId,
    /// west -> center
    pub w_in: RoadId,
    /// center -> east
    pub e_out: RoadId,
    /// south -> center
    pub s_in: RoadId,
    /// center -> north
    pub n_out: RoadId,
}

/// Arms are 50 m; the light cycles west, east, south, north with a 10 s
/// phase and a pass-through rate of 1.
pub fn cross(speed_limit: f64) -> Cross {
    let mut network = Network::new();
    let center = add_intersection(&mut network, (0, 0));
    let west = add_intersection(&mut network, (-1, 0));
    let east = add_intersection(&mut network, (1, 0));
    let south = add_intersection(&mut network, (0, -1));
    let north = add_intersection(&mut network, (0, 1));

    let (w_in, _) = network
        .connect(west, center, Direction::East, 50.0, speed_limit, Point2d::new(-50.0, 0.0))
        .unwrap();
    let (e_out, _) = network
        .connect(center, east, Direction::East, 50.0, speed_limit, Point2d::new(0.0, 0.0))
        .unwrap();
    let (s_in, _) = network
        .connect(south, center, Direction::North, 50.0, speed_limit, Point2d::new(0.0, -50.0))
        .unwrap();
    let (n_out, _) = network
        .connect(center, north, Direction::North, 50.0, speed_limit, Point2d::new(0.0, 0.0))
        .unwrap();

    for (index, from) in [west, east, south, north].into_iter().enumerate() {
        network.set_phase(center, from, index).unwrap();
        network.set_pass_through_rate(center, from, 1).unwrap();
    }
    pathways_everywhere(&mut network, 2.0);

    Cross {
        network,
        center,
        west,
        east,
        south,
        north,
        w_in,
        e_out,
        s_in,
        n_out,
    }
}

/// A west-east line of intersections a - b - c - d with a fifth
/// intersection e hanging north of c, making c the only signalised
/// intersection (three neighbours).
pub struct Tee {
    pub network: Network,
    pub a: IntersectionId,
    pub b: IntersectionId,
    pub c: IntersectionId,
    pub d: IntersectionId,
    pub e: IntersectionId,
    /// a -> b
    pub ab: RoadId,
    /// b -> c
    pub bc: RoadId,
    /// c -> d
    pub cd: RoadId,
    /// c -> e
    pub ce: RoadId,
}

/// Roads are 50 m; c cycles b, d, e with a 10 s phase and a pass-through
/// rate of 1.
pub fn tee(speed_limit: f64) -> Tee {
    let mut network = Network::new();
    let a = add_intersection(&mut network, (-2, 0));
    let b = add_intersection(&mut network, (-1, 0));
    let c = add_intersection(&mut network, (0, 0));
    let d = add_intersection(&mut network, (1, 0));
    let e = add_intersection(&mut network, (0, 1));

    let (ab, _) = network
        .connect(a, b, Direction::East, 50.0, speed_limit, Point2d::new(-100.0, 0.0))
        .unwrap();
    let (bc, _) = network
        .connect(b, c, Direction::East, 50.0, speed_limit, Point2d::new(-50.0, 0.0))
        .unwrap();
    let (cd, _) = network
        .connect(c, d, Direction::East, 50.0, speed_limit, Point2d::new(0.0, 0.0))
        .unwrap();
    let (ce, _) = network
        .connect(c, e, Direction::North, 50.0, speed_limit, Point2d::new(0.0, 0.0))
        .unwrap();

    for (index, from) in [b, d, e].into_iter().enumerate() {
        network.set_phase(c, from, index).unwrap();
        network.set_pass_through_rate(c, from, 1).unwrap();
    }
    pathways_everywhere(&mut network, 2.0);

    Tee {
        network,
        a,
        b,
        c,
        d,
        e,
        ab,
        bc,
        cd,
        ce,
    }
}

fn add_intersection(network: &mut Network, coords: (i32, i32)) -> IntersectionId {
    network.add_intersection(&IntersectionAttributes {
        coords,
        phase_duration: 10.0,
    })
}

/// Gives every (incoming, outgoing) neighbour pair of every intersection a
/// virtual pathway with the same traversal time.
pub fn pathways_everywhere(network: &mut Network, traversal_time: f64) {
    let mut pairs: Vec<(IntersectionId, IntersectionId, IntersectionId)> = Vec::new();
    for intersection in network.iter_intersections() {
        for &from in intersection.neighbours() {
            for &to in intersection.neighbours() {
                if from != to {
                    pairs.push((intersection.id(), from, to));
                }
            }
        }
    }
    for (at, from, to) in pairs {
        network.add_pathway(at, from, to, traversal_time).unwrap();
    }
}
