//! Section builders for the RAS GIS Import text format.
//!
//! Each section appends to a `fmt::Write` sink in a fixed order: header,
//! then stream network. All input is checked before the first byte is
//! written, so a failed build leaves the sink untouched.

use std::fmt::Write;

use crate::error::{FormatError, Result};
use crate::geometry::{LineString, parse_linestring};

use super::format::{
    ExportContext, NodeRecord, ReachRecord, STREAM_LAYER, XS_LAYER, check_single_line,
};

pub fn write_header<W: Write>(out: &mut W, ctx: &ExportContext) -> Result<()> {
    ctx.validate()?;

    writeln!(out, "#This file is generated by {}", ctx.generator)?;
    writeln!(out, "BEGIN HEADER:")?;
    writeln!(out, "   DTM TYPE: GRID")?;
    writeln!(out, "   DTM:")?;
    writeln!(out, "   STREAM LAYER: {}", ctx.layer_path(STREAM_LAYER))?;
    writeln!(out, "   NUMBER OF REACHES: {}", ctx.reach_count)?;
    writeln!(out, "   CROSS-SECTION LAYER: {}", ctx.layer_path(XS_LAYER))?;
    writeln!(out, "   NUMBER OF CROSS-SECTIONS: {}", ctx.cross_section_count)?;
    writeln!(out, "   MAP PROJECTION:")?;
    writeln!(out, "   PROJECTION ZONE:")?;
    writeln!(out, "   DATUM:")?;
    writeln!(out, "   VERTICAL DATUM:")?;
    writeln!(out, "   BEGIN SPATIAL EXTENT:")?;
    writeln!(out, "      XMIN: {}", ctx.extent.xmin)?;
    writeln!(out, "      YMIN: {}", ctx.extent.ymin)?;
    writeln!(out, "      XMAX: {}", ctx.extent.xmax)?;
    writeln!(out, "      YMAX: {}", ctx.extent.ymax)?;
    writeln!(out, "   END SPATIAL EXTENT:")?;
    writeln!(out, "      UNITS: {}", ctx.spatial_unit)?;
    writeln!(out, "END HEADER:")?;
    writeln!(out)?;
    Ok(())
}

pub fn write_network<W: Write>(
    out: &mut W,
    nodes: &[NodeRecord],
    reaches: &[ReachRecord],
) -> Result<()> {
    let centerlines = parse_centerlines(reaches)?;

    writeln!(out, "BEGIN STREAM NETWORK:")?;
    writeln!(out)?;

    for node in nodes {
        writeln!(
            out,
            "   ENDPOINT: {:.6}, {:.6}, 0, {}",
            node.x, node.y, node.node_id
        )?;
    }

    for (reach, line) in reaches.iter().zip(&centerlines) {
        writeln!(out)?;
        writeln!(out, "   REACH:")?;
        writeln!(out, "      STREAM ID: {}", reach.stream_id)?;
        writeln!(out, "      REACH ID: {}", reach.reach_id)?;
        writeln!(out, "      FROM POINT: {}", reach.from_node)?;
        writeln!(out, "      TO POINT: {}", reach.to_node)?;
        writeln!(out, "      CENTERLINE:")?;
        for point in &line.points {
            writeln!(out, "         {}, NULL", point)?;
        }
        writeln!(out, "   END:")?;
    }

    // Blank line before the trailer only when the network has content
    if !nodes.is_empty() || !reaches.is_empty() {
        writeln!(out)?;
    }
    writeln!(out, "END STREAM NETWORK:")?;
    writeln!(out)?;
    Ok(())
}

fn parse_centerlines(reaches: &[ReachRecord]) -> Result<Vec<LineString>> {
    let mut lines = Vec::with_capacity(reaches.len());
    for reach in reaches {
        check_single_line("stream_id", &reach.stream_id)?;
        check_single_line("reach_id", &reach.reach_id)?;
        lines.push(parse_linestring(&reach.centerline_wkt)?);
    }
    Ok(lines)
}

pub fn build_header(ctx: &ExportContext) -> Result<String> {
    let mut hdr = String::new();
    write_header(&mut hdr, ctx)?;
    Ok(hdr)
}

pub fn build_network(nodes: &[NodeRecord], reaches: &[ReachRecord]) -> Result<String> {
    let mut net = String::new();
    write_network(&mut net, nodes, reaches)?;
    Ok(net)
}

/// Header followed by the stream network.
///
/// Fails if the context's reach count disagrees with the reaches supplied.
pub fn build_document(
    ctx: &ExportContext,
    nodes: &[NodeRecord],
    reaches: &[ReachRecord],
) -> Result<String> {
    if ctx.reach_count != reaches.len() as u64 {
        return Err(FormatError::CountMismatch {
            layer: STREAM_LAYER,
            expected: ctx.reach_count,
            actual: reaches.len(),
        }
        .into());
    }

    let header = build_header(ctx)?;
    let network = build_network(nodes, reaches)?;

    let mut imp = String::with_capacity(header.len() + network.len());
    imp.push_str(&header);
    imp.push_str(&network);
    Ok(imp)
}
